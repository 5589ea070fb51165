//! Commands that can be sent to the bridge.
//!
//! Every command starts with `AT`. Commands with arguments use the
//! `AT+VERB=ARGS` form:
//! - Radio configuration (rate, addresses, direction)
//! - Payload transfer (read, write)
//! - Diagnostics (dump)

use crate::codec::{LineCodec, LINE_TERMINATOR, SENTINEL};
use crate::error::{Rf24Error, Rf24Result};

/// Radio direction selected with `AT+DIR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Transmit mode (stop listening).
    Tx,
    /// Receive mode (start listening).
    Rx,
}

impl Direction {
    /// Get the argument string used in the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Tx => "TX",
            Direction::Rx => "RX",
        }
    }

    /// Parse a direction from its argument string.
    pub fn from_str(s: &str) -> Option<Direction> {
        match s {
            "TX" => Some(Direction::Tx),
            "RX" => Some(Direction::Rx),
            _ => None,
        }
    }
}

/// Commands understood by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Liveness probe.
    Test,

    /// Set the air data rate.
    SetRate {
        /// Rate index as understood by the bridge firmware.
        rate: u32,
    },

    /// Set the address used when transmitting.
    SetTxAddress {
        /// Short ASCII address token.
        address: String,
    },

    /// Set the address listened on.
    SetRxAddress {
        /// Short ASCII address token.
        address: String,
    },

    /// Switch between transmitting and listening.
    SetDirection(Direction),

    /// Read a payload of `len` bytes.
    Read {
        /// Number of payload bytes that follow the command.
        len: usize,
    },

    /// Write a payload of `len` bytes.
    Write {
        /// Number of payload bytes the host sends after the command.
        len: usize,
    },

    /// Print the bridge settings on its own console.
    Dump,

    /// Send a raw command string.
    Raw {
        /// The raw command text, without sentinel.
        command: String,
    },
}

impl Command {
    /// Build a `SetTxAddress` command, rejecting addresses that would break framing.
    pub fn set_tx_address(address: &str) -> Rf24Result<Command> {
        validate_address(address)?;
        Ok(Command::SetTxAddress {
            address: address.to_string(),
        })
    }

    /// Build a `SetRxAddress` command, rejecting addresses that would break framing.
    pub fn set_rx_address(address: &str) -> Rf24Result<Command> {
        validate_address(address)?;
        Ok(Command::SetRxAddress {
            address: address.to_string(),
        })
    }

    /// Encode the command for the bridge.
    /// Returns the bytes to send (including the `#` sentinel).
    pub fn encode(&self) -> Vec<u8> {
        let cmd_str = self.to_command_string();
        LineCodec::encode_command(&cmd_str)
    }

    /// Get the command string without the sentinel.
    pub fn to_command_string(&self) -> String {
        match self {
            Command::Test => "AT".to_string(),
            Command::SetRate { rate } => format!("AT+RATE={}", rate),
            Command::SetTxAddress { address } => format!("AT+TXADDR={}", address),
            Command::SetRxAddress { address } => format!("AT+RXADDR={}", address),
            Command::SetDirection(dir) => format!("AT+DIR={}", dir.as_str()),
            Command::Read { len } => format!("AT+READ={}", len),
            Command::Write { len } => format!("AT+WRITE={}", len),
            Command::Dump => "AT+DUMP".to_string(),
            Command::Raw { command } => command.clone(),
        }
    }

    /// Number of payload bytes the host sends after this command.
    pub fn outgoing_payload_len(&self) -> usize {
        match self {
            Command::Write { len } => *len,
            Command::Raw { command } => raw_payload_len(command, "AT+WRITE="),
            _ => 0,
        }
    }

    /// Number of payload bytes the bridge sends before the status line.
    pub fn incoming_payload_len(&self) -> usize {
        match self {
            Command::Read { len } => *len,
            Command::Raw { command } => raw_payload_len(command, "AT+READ="),
            _ => 0,
        }
    }

    /// Check if a payload travels with this command in either direction.
    pub fn carries_payload(&self) -> bool {
        match self {
            Command::Read { .. } | Command::Write { .. } => true,
            Command::Raw { command } => {
                command.starts_with("AT+READ=") || command.starts_with("AT+WRITE=")
            }
            _ => false,
        }
    }

    /// Check that the command text can be framed with a single sentinel.
    pub fn validate(&self) -> Rf24Result<()> {
        match self {
            Command::SetTxAddress { address } | Command::SetRxAddress { address } => {
                validate_address(address)
            }
            Command::Raw { command } => {
                if command.is_empty() {
                    return Err(Rf24Error::InvalidCommand("empty command".to_string()));
                }
                check_framing("command", command)
            }
            _ => Ok(()),
        }
    }
}

fn raw_payload_len(command: &str, prefix: &str) -> usize {
    command
        .strip_prefix(prefix)
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Addresses go on the wire verbatim, so they must not contain framing bytes.
fn validate_address(address: &str) -> Rf24Result<()> {
    if address.is_empty() {
        return Err(Rf24Error::InvalidCommand("empty address".to_string()));
    }
    check_framing("address", address)
}

fn check_framing(what: &str, text: &str) -> Rf24Result<()> {
    if text
        .bytes()
        .any(|b| b == SENTINEL || b == LINE_TERMINATOR || b == b'\r')
    {
        return Err(Rf24Error::InvalidCommand(format!(
            "{} {:?} contains a framing character",
            what, text
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_test() {
        assert_eq!(Command::Test.encode(), b"AT#");
    }

    #[test]
    fn test_encode_set_rate() {
        assert_eq!(Command::SetRate { rate: 1 }.encode(), b"AT+RATE=1#");
    }

    #[test]
    fn test_encode_direction() {
        assert_eq!(Command::SetDirection(Direction::Tx).encode(), b"AT+DIR=TX#");
        assert_eq!(Command::SetDirection(Direction::Rx).encode(), b"AT+DIR=RX#");
    }

    #[test]
    fn test_encode_addresses() {
        let tx = Command::set_tx_address("NODE1").unwrap();
        assert_eq!(tx.encode(), b"AT+TXADDR=NODE1#");

        let rx = Command::set_rx_address("NODE2").unwrap();
        assert_eq!(rx.encode(), b"AT+RXADDR=NODE2#");
    }

    #[test]
    fn test_encode_transfer() {
        assert_eq!(Command::Read { len: 16 }.encode(), b"AT+READ=16#");
        assert_eq!(Command::Write { len: 4 }.encode(), b"AT+WRITE=4#");
        assert_eq!(Command::Write { len: 4 }.outgoing_payload_len(), 4);
        assert_eq!(Command::Read { len: 4 }.outgoing_payload_len(), 0);
    }

    #[test]
    fn test_encode_dump() {
        assert_eq!(Command::Dump.encode(), b"AT+DUMP#");
    }

    #[test]
    fn test_single_sentinel() {
        let commands = [
            Command::Test,
            Command::SetRate { rate: 2 },
            Command::SetDirection(Direction::Rx),
            Command::Read { len: 4 },
            Command::Dump,
        ];
        for cmd in commands {
            let encoded = cmd.encode();
            assert_eq!(encoded.iter().filter(|&&b| b == SENTINEL).count(), 1);
            assert_eq!(encoded.last(), Some(&SENTINEL));
        }
    }

    #[test]
    fn test_rejects_framing_in_address() {
        assert!(matches!(
            Command::set_tx_address("NO#DE"),
            Err(Rf24Error::InvalidCommand(_))
        ));
        assert!(Command::set_rx_address("NODE\n").is_err());
        assert!(Command::set_rx_address("").is_err());
    }

    #[test]
    fn test_payload_lengths() {
        let read = Command::Read { len: 16 };
        assert_eq!(read.incoming_payload_len(), 16);
        assert!(read.carries_payload());

        let raw_read = Command::Raw {
            command: "AT+READ=8".to_string(),
        };
        assert_eq!(raw_read.incoming_payload_len(), 8);
        assert_eq!(raw_read.outgoing_payload_len(), 0);
        assert!(raw_read.carries_payload());

        let raw_write = Command::Raw {
            command: "AT+WRITE=2".to_string(),
        };
        assert_eq!(raw_write.outgoing_payload_len(), 2);
        assert!(raw_write.carries_payload());

        assert!(!Command::Dump.carries_payload());
        assert!(!Command::Raw {
            command: "AT+DUMP".to_string()
        }
        .carries_payload());
    }

    #[test]
    fn test_validate_raw() {
        let ok = Command::Raw {
            command: "AT+RATE=2".to_string(),
        };
        assert!(ok.validate().is_ok());

        for bad in ["AT#X", "AT\n", "AT\r", ""] {
            let cmd = Command::Raw {
                command: bad.to_string(),
            };
            assert!(matches!(cmd.validate(), Err(Rf24Error::InvalidCommand(_))));
        }
    }

    #[test]
    fn test_validate_address_built_directly() {
        let cmd = Command::SetRxAddress {
            address: "N#2".to_string(),
        };
        assert!(cmd.validate().is_err());
        assert!(Command::set_rx_address("NODE2").unwrap().validate().is_ok());
    }

    #[test]
    fn test_direction_round_trip() {
        assert_eq!(Direction::from_str("RX"), Some(Direction::Rx));
        assert_eq!(Direction::from_str(Direction::Tx.as_str()), Some(Direction::Tx));
        assert_eq!(Direction::from_str("rx"), None);
    }
}
