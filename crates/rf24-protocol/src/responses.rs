//! Status line parsing.
//!
//! Every exchange ends with a status line from the bridge:
//! - `OK...`: the command succeeded
//! - `FAIL...`: the command failed, the rest of the line is diagnostic text
//!
//! Lines that are neither are debug output from the bridge and are skipped.
//! An empty line means the transport produced nothing before timing out.

/// Outcome of a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Line starting with `OK`.
    Ok,

    /// Line starting with `FAIL`.
    /// Holds the complete line, byte for byte.
    Fail(String),

    /// Nothing was received.
    NoResponse,
}

impl Status {
    /// Classify a received line.
    ///
    /// The input is the line without its `\n`. Returns `None` for lines that
    /// are not status lines and should be skipped.
    pub fn classify(line: &str) -> Option<Status> {
        if line.is_empty() {
            return Some(Status::NoResponse);
        }

        if line.starts_with("OK") {
            return Some(Status::Ok);
        }

        if line.starts_with("FAIL") {
            return Some(Status::Fail(line.to_string()));
        }

        None
    }

    /// Check if this is an OK status.
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    /// Get the failure line if this is a `Fail` status.
    pub fn as_failure(&self) -> Option<&str> {
        match self {
            Status::Fail(line) => Some(line),
            _ => None,
        }
    }
}

/// Result of an exchange that did not fail.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The bridge answered `OK`.
    Confirmed,
    /// The transport went quiet before a status line arrived.
    Unconfirmed,
}

impl Confirmation {
    /// Check if the bridge confirmed the exchange.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Confirmation::Confirmed)
    }
}
