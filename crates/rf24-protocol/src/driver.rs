//! Blocking protocol driver.
//!
//! [`Rf24Serial`] owns a transport and runs one exchange at a time: write the
//! command, move the payload if there is one, then read lines until a status
//! line arrives.

use std::io;

use tracing::{debug, trace, warn};

use crate::codec::LineCodec;
use crate::commands::{Command, Direction};
use crate::error::{Rf24Error, Rf24Result};
use crate::responses::{Confirmation, Status};
use crate::telemetry::Telemetry;
use crate::transport::{is_timeout, Transport};

/// Default number of consecutive empty payload reads before giving up.
pub const DEFAULT_MAX_READ_RETRIES: u32 = 5;

/// Driver behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Log wire traffic and payload bytes at debug level.
    pub verbose: bool,
    /// Treat a missing status line as an error instead of [`Confirmation::Unconfirmed`].
    pub require_status: bool,
    /// Consecutive failed reads tolerated while filling a payload.
    pub max_read_retries: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            verbose: false,
            require_status: false,
            max_read_retries: DEFAULT_MAX_READ_RETRIES,
        }
    }
}

/// Driver for a serial nRF24 bridge.
pub struct Rf24Serial<T: Transport> {
    transport: T,
    config: DriverConfig,
    codec: LineCodec,
}

impl<T: Transport> Rf24Serial<T> {
    /// Create a driver over an already configured transport.
    pub fn new(transport: T, config: DriverConfig) -> Self {
        Rf24Serial {
            transport,
            config,
            codec: LineCodec::new(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Get a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Send `AT`, used as a liveness probe.
    pub fn test(&mut self) -> Rf24Result<Confirmation> {
        self.execute(&Command::Test)
    }

    /// Send `AT+RATE=<rate>`.
    pub fn set_rate(&mut self, rate: u32) -> Rf24Result<Confirmation> {
        self.execute(&Command::SetRate { rate })
    }

    /// Send `AT+TXADDR=<address>`.
    pub fn set_tx_address(&mut self, address: &str) -> Rf24Result<Confirmation> {
        let cmd = Command::set_tx_address(address)?;
        self.execute(&cmd)
    }

    /// Send `AT+RXADDR=<address>`.
    pub fn set_rx_address(&mut self, address: &str) -> Rf24Result<Confirmation> {
        let cmd = Command::set_rx_address(address)?;
        self.execute(&cmd)
    }

    /// Send `AT+DIR=RX`.
    pub fn start_listening(&mut self) -> Rf24Result<Confirmation> {
        self.execute(&Command::SetDirection(Direction::Rx))
    }

    /// Send `AT+DIR=TX`.
    pub fn stop_listening(&mut self) -> Rf24Result<Confirmation> {
        self.execute(&Command::SetDirection(Direction::Tx))
    }

    /// Send `AT+DUMP`. The settings are printed on the bridge's own console.
    pub fn dump(&mut self) -> Rf24Result<Confirmation> {
        self.execute(&Command::Dump)
    }

    /// Read `buf.len()` payload bytes, then check the status line.
    ///
    /// The buffer is filled before the status is consulted. If the status is
    /// `FAIL` the bytes already in `buf` stay there.
    pub fn read(&mut self, buf: &mut [u8]) -> Rf24Result<Confirmation> {
        self.send_command(&Command::Read { len: buf.len() })?;
        self.read_payload(buf)?;
        self.check_status()
    }

    /// Write `data` as a payload, then check the status line.
    pub fn write(&mut self, data: &[u8]) -> Rf24Result<Confirmation> {
        self.send_command(&Command::Write { len: data.len() })?;
        self.write_raw(data)?;
        self.check_status()
    }

    /// Read one telemetry frame.
    pub fn read_telemetry(&mut self) -> Rf24Result<(Telemetry, Confirmation)> {
        let mut buf = [0u8; Telemetry::SIZE];
        let confirmation = self.read(&mut buf)?;
        Ok((Telemetry::decode(&buf), confirmation))
    }

    /// Send a command that carries no payload and check its status.
    ///
    /// Transfers must go through [`read`](Self::read) or [`write`](Self::write),
    /// otherwise payload bytes would be parsed as status lines.
    pub fn execute(&mut self, cmd: &Command) -> Rf24Result<Confirmation> {
        if cmd.carries_payload() {
            return Err(Rf24Error::InvalidCommand(format!(
                "'{}' transfers a payload, use read() or write()",
                cmd.to_command_string()
            )));
        }
        self.send_command(cmd)?;
        self.check_status()
    }

    /// Read lines until a status line arrives.
    ///
    /// `OK` confirms, `FAIL` becomes [`Rf24Error::ProtocolFailure`], and an
    /// empty line ends the exchange unconfirmed. Other lines are skipped.
    pub fn check_status(&mut self) -> Rf24Result<Confirmation> {
        loop {
            let line = self.read_line()?;
            match Status::classify(&line) {
                Some(Status::Ok) => {
                    trace!("RF24: status '{}'", line.trim_end());
                    return Ok(Confirmation::Confirmed);
                }
                Some(Status::Fail(reason)) => {
                    debug!("RF24: bridge reported '{}'", reason);
                    return Err(Rf24Error::ProtocolFailure(reason));
                }
                Some(Status::NoResponse) => {
                    if self.config.require_status {
                        return Err(Rf24Error::NoResponse);
                    }
                    debug!("RF24: no status line received");
                    return Ok(Confirmation::Unconfirmed);
                }
                None => {
                    debug!("RF24: discarded '{}'", line.trim_end());
                }
            }
        }
    }

    // ========================================================================
    // Wire Helpers
    // ========================================================================

    /// Frame and send a command.
    fn send_command(&mut self, cmd: &Command) -> Rf24Result<()> {
        cmd.validate()?;
        let frame = cmd.encode();
        if self.config.verbose {
            debug!("RF24: sending '{}'", String::from_utf8_lossy(&frame));
        } else {
            trace!("RF24: sending '{}'", cmd.to_command_string());
        }
        self.write_raw(&frame)
    }

    fn write_raw(&mut self, data: &[u8]) -> Rf24Result<()> {
        self.transport.write_all_bytes(data)?;
        self.transport.flush()?;
        Ok(())
    }

    /// Fill `buf` from the transport.
    ///
    /// Short reads are accumulated by offset. Reads that deliver nothing count
    /// against `max_read_retries`; the count resets whenever data arrives.
    fn read_payload(&mut self, buf: &mut [u8]) -> Rf24Result<()> {
        let expected = buf.len();
        let mut filled = 0;
        let mut failures = 0;

        while filled < expected {
            match self.transport.read_bytes(&mut buf[filled..]) {
                Ok(n) if n > 0 => {
                    filled += n;
                    failures = 0;
                    continue;
                }
                Ok(_) => warn!("RF24: payload read returned no data ({}/{})", filled, expected),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => warn!("RF24: payload read failed ({}/{}): {}", filled, expected, e),
            }

            failures += 1;
            if failures > self.config.max_read_retries {
                return Err(Rf24Error::TransportFailure { filled, expected });
            }
        }

        if self.config.verbose {
            debug!("RF24: read {} payload bytes: {:02x?}", expected, buf);
        }
        Ok(())
    }

    /// Read one `\n` terminated line, one byte per transport call.
    ///
    /// Returns an empty string if the transport times out first; any partial
    /// line is dropped.
    fn read_line(&mut self) -> Rf24Result<String> {
        let mut byte = [0u8; 1];
        loop {
            match self.transport.read_bytes(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    if let Some(line) = self.codec.push(byte[0]) {
                        trace!("RF24: received '{}'", line.trim_end());
                        return Ok(line);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if is_timeout(&e) => break,
                Err(e) => {
                    self.codec.clear();
                    return Err(e.into());
                }
            }
        }

        if self.codec.buffered_len() > 0 {
            debug!("RF24: dropping partial line '{}'", self.codec.buffer_as_str());
            self.codec.clear();
        }
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedTransport;

    fn driver(transport: ScriptedTransport) -> Rf24Serial<ScriptedTransport> {
        Rf24Serial::new(transport, DriverConfig::default())
    }

    #[test]
    fn test_ok_is_confirmed() {
        let mut radio = driver(ScriptedTransport::new().expect("AT", b"OK\n"));
        assert_eq!(radio.test().unwrap(), Confirmation::Confirmed);
        assert_eq!(radio.transport().written(), b"AT#");
    }

    #[test]
    fn test_noise_before_status_is_skipped() {
        let reply = b"STATUS = 0x0e\nRX_ADDR_P0-1 = 0x65646f4e31\n\rhello\nOK\n";
        let mut radio = driver(ScriptedTransport::new().expect("AT+DUMP", reply));
        assert_eq!(radio.dump().unwrap(), Confirmation::Confirmed);
    }

    #[test]
    fn test_fail_carries_line() {
        let mut radio = driver(ScriptedTransport::new().expect("AT+RATE=9", b"FAIL rate\r\n"));
        match radio.set_rate(9) {
            Err(Rf24Error::ProtocolFailure(line)) => assert_eq!(line, "FAIL rate\r"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_silence_is_unconfirmed() {
        let mut radio = driver(ScriptedTransport::new());
        assert_eq!(radio.test().unwrap(), Confirmation::Unconfirmed);
    }

    #[test]
    fn test_partial_line_then_silence() {
        let mut radio = driver(ScriptedTransport::new().expect("AT", b"OK"));
        assert_eq!(radio.test().unwrap(), Confirmation::Unconfirmed);
    }

    #[test]
    fn test_silence_is_error_when_status_required() {
        let config = DriverConfig {
            require_status: true,
            ..DriverConfig::default()
        };
        let mut radio = Rf24Serial::new(ScriptedTransport::new(), config);
        assert!(matches!(radio.test(), Err(Rf24Error::NoResponse)));
    }

    #[test]
    fn test_execute_rejects_write_without_payload() {
        let mut radio = driver(ScriptedTransport::new());
        assert!(matches!(
            radio.execute(&Command::Write { len: 3 }),
            Err(Rf24Error::InvalidCommand(_))
        ));
        assert!(radio.transport().written().is_empty());
    }

    #[test]
    fn test_execute_rejects_read() {
        let mut radio =
            driver(ScriptedTransport::new().expect("AT+READ=4", b"\x0a\x01\x02\x03OK\n"));
        assert!(matches!(
            radio.execute(&Command::Read { len: 4 }),
            Err(Rf24Error::InvalidCommand(_))
        ));
        assert!(radio.transport().written().is_empty());

        let mut buf = [0u8; 4];
        assert!(radio.read(&mut buf).unwrap().is_confirmed());
        assert_eq!(buf, [0x0a, 1, 2, 3]);
    }

    #[test]
    fn test_execute_rejects_raw_transfers() {
        let mut radio = driver(ScriptedTransport::new());
        for text in ["AT+READ=4", "AT+WRITE=2"] {
            let cmd = Command::Raw {
                command: text.to_string(),
            };
            assert!(matches!(radio.execute(&cmd), Err(Rf24Error::InvalidCommand(_))));
        }
        assert!(radio.transport().written().is_empty());
    }

    #[test]
    fn test_execute_rejects_sentinel_in_raw() {
        let mut radio = driver(ScriptedTransport::new().expect("AT", b"OK\n"));
        let cmd = Command::Raw {
            command: "AT#X".to_string(),
        };
        assert!(matches!(radio.execute(&cmd), Err(Rf24Error::InvalidCommand(_))));
        assert!(radio.transport().written().is_empty());
        assert!(radio.transport().commands().is_empty());
    }

    #[test]
    fn test_execute_raw() {
        let mut radio = driver(ScriptedTransport::new().expect("AT+RATE=2", b"OK\n"));
        let cmd = Command::Raw {
            command: "AT+RATE=2".to_string(),
        };
        assert!(radio.execute(&cmd).unwrap().is_confirmed());
        assert_eq!(radio.transport().written(), b"AT+RATE=2#");
    }

    #[test]
    fn test_invalid_address_writes_nothing() {
        let mut radio = driver(ScriptedTransport::new());
        assert!(radio.set_tx_address("A#B").is_err());
        assert!(radio.transport().written().is_empty());
    }
}
