//! Runner configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command line flags. Every field has a default, so an empty file (or no file
//! at all) gives the stock bridge setup:
//!
//! ```yaml
//! serial:
//!   baud_rate: 9600
//!   timeout_ms: 2000
//! driver:
//!   verbose: false
//!   require_status: false
//!   max_read_retries: 5
//! settle_ms: 2000
//! rx_address: NODE2
//! tx_address: NODE1
//! rate: 1
//! reads: 2
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use rf24_protocol::serial::{SerialSettings, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT_MS};
use rf24_protocol::{DriverConfig, DEFAULT_MAX_READ_RETRIES};
use serde::{Deserialize, Serialize};

use crate::error::{RunnerError, RunnerResult};

/// Serial line section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSection {
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

impl Default for SerialSection {
    fn default() -> Self {
        SerialSection {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Driver section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSection {
    pub verbose: bool,
    pub require_status: bool,
    pub max_read_retries: u32,
}

impl Default for DriverSection {
    fn default() -> Self {
        DriverSection {
            verbose: false,
            require_status: false,
            max_read_retries: DEFAULT_MAX_READ_RETRIES,
        }
    }
}

/// Complete runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub serial: SerialSection,
    pub driver: DriverSection,
    /// Delay after opening the port before the first command.
    /// Opening the port resets most Arduino-based bridges.
    pub settle_ms: u64,
    /// Address listened on.
    pub rx_address: String,
    /// Address transmitted to.
    pub tx_address: String,
    /// Air data rate used by the telemetry runner.
    pub rate: u32,
    /// Number of counter reads done by the probe runner.
    pub reads: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            serial: SerialSection::default(),
            driver: DriverSection::default(),
            settle_ms: 2000,
            rx_address: "NODE2".to_string(),
            tx_address: "NODE1".to_string(),
            rate: 1,
            reads: 2,
        }
    }
}

impl RunnerConfig {
    /// Serial settings for opening the port.
    pub fn serial_settings(&self) -> SerialSettings {
        SerialSettings {
            baud_rate: self.serial.baud_rate,
            timeout_ms: self.serial.timeout_ms,
        }
    }

    /// Driver settings.
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            verbose: self.driver.verbose,
            require_status: self.driver.require_status,
            max_read_retries: self.driver.max_read_retries,
        }
    }

    /// Reject settings the bridge cannot work with.
    pub fn validate(&self) -> RunnerResult<()> {
        if self.serial.baud_rate == 0 {
            return Err(RunnerError::ConfigError("baud_rate must be positive".to_string()));
        }
        if self.serial.timeout_ms == 0 {
            return Err(RunnerError::ConfigError(
                "timeout_ms must be positive, a zero timeout never blocks".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a configuration from a YAML string.
pub fn load_config_from_str(yaml: &str) -> RunnerResult<RunnerConfig> {
    let config: RunnerConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Load a configuration from a YAML file.
pub fn load_config(path: &Path) -> RunnerResult<RunnerConfig> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Flags shared by the runner binaries.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Serial baud rate
    #[arg(long)]
    pub baud: Option<u32>,

    /// Serial read/write timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Delay after opening the port, in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Address to listen on
    #[arg(long)]
    pub rx_address: Option<String>,

    /// Address to transmit to
    #[arg(long)]
    pub tx_address: Option<String>,

    /// Treat a missing status line as an error
    #[arg(long)]
    pub require_status: bool,

    /// Consecutive empty reads tolerated while reading a payload
    #[arg(long)]
    pub max_read_retries: Option<u32>,

    /// Log wire traffic
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Load the configuration file (if any) and apply the flags on top.
    pub fn resolve(&self) -> RunnerResult<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RunnerConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Override configuration values with the flags that were given.
    pub fn apply(&self, config: &mut RunnerConfig) {
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.serial.timeout_ms = timeout_ms;
        }
        if let Some(settle_ms) = self.settle_ms {
            config.settle_ms = settle_ms;
        }
        if let Some(addr) = &self.rx_address {
            config.rx_address = addr.clone();
        }
        if let Some(addr) = &self.tx_address {
            config.tx_address = addr.clone();
        }
        if let Some(retries) = self.max_read_retries {
            config.driver.max_read_retries = retries;
        }
        config.driver.require_status |= self.require_status;
        config.driver.verbose |= self.verbose;
    }
}
