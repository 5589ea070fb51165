//! Runners for serial nRF24 bridges.
//!
//! This crate holds everything around the protocol driver that a command line
//! tool needs: configuration (YAML file plus flags), logging setup, and the two
//! fixed command sequences:
//!
//! - **probe**: configure addresses, start listening, dump settings, then read
//!   a few 4-byte counters
//! - **telemetry**: configure the link and print motor telemetry frames as
//!   they arrive

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use config::{CommonArgs, RunnerConfig};
pub use error::{RunnerError, RunnerResult};
pub use session::{run_probe, run_telemetry};
