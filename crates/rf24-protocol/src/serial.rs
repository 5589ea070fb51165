//! Serial port transport.
//!
//! The bridge talks 9600 baud, 8N1. Reads and writes block for at most the
//! configured timeout, which is what bounds each primitive driver read.

use std::time::Duration;

use serialport::{DataBits, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::driver::{DriverConfig, Rf24Serial};
use crate::error::{Rf24Error, Rf24Result};

/// Baud rate of the bridge firmware.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Per-read and per-write timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Serial line settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    /// Line speed.
    pub baud_rate: u32,
    /// Read/write timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        SerialSettings {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Open and configure the serial port at `path`.
pub fn open_port(path: &str, settings: &SerialSettings) -> Rf24Result<Box<dyn SerialPort>> {
    let port = serialport::new(path, settings.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_millis(settings.timeout_ms))
        .open()
        .map_err(|e| Rf24Error::Serial(format!("failed to open port '{}': {}", path, e)))?;

    info!(
        "Opened serial port {} at {} baud",
        port.name().unwrap_or_else(|| path.to_string()),
        settings.baud_rate
    );
    Ok(port)
}

/// Log the line settings the port is actually using.
pub fn describe_port(port: &dyn SerialPort) {
    let parity = match port.parity() {
        Ok(Parity::None) => "none",
        Ok(Parity::Odd) => "odd",
        Ok(Parity::Even) => "even",
        Err(_) => "unknown",
    };
    debug!(
        "Serial settings: data bits {:?}, parity {}, stop bits {:?}, timeout {:?}",
        port.data_bits().ok(),
        parity,
        port.stop_bits().ok(),
        port.timeout()
    );
}

impl Rf24Serial<Box<dyn SerialPort>> {
    /// Open the port at `path` and wrap it in a driver.
    pub fn open(path: &str, settings: &SerialSettings, config: DriverConfig) -> Rf24Result<Self> {
        let port = open_port(path, settings)?;
        if config.verbose {
            describe_port(port.as_ref());
        }
        Ok(Rf24Serial::new(port, config))
    }
}
