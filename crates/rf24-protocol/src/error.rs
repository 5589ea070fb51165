//! Error types for the AT protocol driver.

use thiserror::Error;

/// Errors that can occur while talking to the bridge.
#[derive(Debug, Error)]
pub enum Rf24Error {
    /// The bridge answered with a `FAIL` line.
    ///
    /// Holds the complete line as received, e.g. `FAIL bad addr`. A trailing
    /// `\r` from the bridge is kept.
    #[error("{0}")]
    ProtocolFailure(String),

    /// The transport stopped delivering payload bytes.
    #[error("transport failure: read {filled} of {expected} payload bytes")]
    TransportFailure { filled: usize, expected: usize },

    /// No status line arrived and the driver is configured to require one.
    #[error("no status line received")]
    NoResponse,

    /// The command could not be built from the given arguments.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The serial port could not be opened or configured.
    #[error("serial port error: {0}")]
    Serial(String),

    /// Underlying I/O error on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Rf24Error {
    /// Check if this is a `FAIL` reply from the bridge.
    pub fn is_protocol_failure(&self) -> bool {
        matches!(self, Rf24Error::ProtocolFailure(_))
    }
}

/// Result type alias for driver operations.
pub type Rf24Result<T> = Result<T, Rf24Error>;
