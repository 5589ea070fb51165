//! Serial nRF24 AT Protocol
//!
//! This crate drives the AT command interface of an nRF24-based serial radio
//! bridge. The bridge sits on a serial port, accepts short text commands from
//! the host and answers with a status line, optionally preceded by a counted
//! binary payload received over the air.
//!
//! # Protocol Overview
//!
//! The protocol is half-duplex and strictly request/response:
//!
//! - **Commands** (host → bridge): `AT` or `AT+VERB=ARGS`, terminated with a
//!   single `#` sentinel instead of a newline
//! - **Status** (bridge → host): a line beginning with `OK` or `FAIL`,
//!   terminated with `\n`
//! - **Noise**: any other line before the status is diagnostic output and is
//!   skipped
//! - **Payloads**: `AT+READ=<n>` is answered with exactly `n` raw bytes before
//!   the status line; `AT+WRITE=<n>` is followed by `n` raw bytes from the host
//!
//! # Example
//!
//! ```rust,ignore
//! use rf24_protocol::{DriverConfig, Rf24Serial, Telemetry};
//!
//! let mut radio = Rf24Serial::open("/dev/ttyUSB0", &Default::default(), DriverConfig::default())?;
//! radio.test()?;
//! radio.set_rx_address("NODE2")?;
//! radio.start_listening()?;
//!
//! let (telemetry, _) = radio.read_telemetry()?;
//! println!("{}", telemetry);
//! ```

mod codec;
mod commands;
mod driver;
mod error;
mod responses;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod scripted;
#[cfg(feature = "serial")]
pub mod serial;
pub mod telemetry;

pub use codec::*;
pub use commands::*;
pub use driver::*;
pub use error::*;
pub use responses::*;
pub use telemetry::Telemetry;
pub use transport::*;
