//! In-memory bridge for exercising the driver without hardware.
//!
//! [`ScriptedTransport`] parses the `#` terminated commands written to it and
//! answers each one with the next scripted reply. The payload that follows an
//! `AT+WRITE=<n>` command is consumed as raw bytes, so it may contain `#`.
//! When no reply bytes are pending, reads fail with `TimedOut`, like a serial
//! port whose read timeout expired.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use crate::codec::SENTINEL;

/// A scripted exchange: the command expected and the bytes sent back.
#[derive(Debug, Clone)]
struct Exchange {
    command: String,
    reply: Vec<u8>,
}

/// Scripted stand-in for a serial bridge.
#[derive(Debug)]
pub struct ScriptedTransport {
    /// Exchanges not yet consumed, in order.
    script: VecDeque<Exchange>,
    /// Command bytes received since the last sentinel.
    pending: Vec<u8>,
    /// Payload bytes still expected after an `AT+WRITE`.
    payload_remaining: usize,
    /// Reply held back until the write payload is complete.
    deferred_reply: Option<Vec<u8>>,
    /// Bytes waiting to be read by the host.
    rx: VecDeque<u8>,
    /// Maximum bytes returned by a single read.
    max_chunk: usize,
    /// Everything the host wrote.
    written: Vec<u8>,
    /// Commands received, without sentinel.
    commands: Vec<String>,
    /// Payloads received after `AT+WRITE`.
    payloads: Vec<Vec<u8>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    /// Create a transport with an empty script.
    pub fn new() -> Self {
        ScriptedTransport {
            script: VecDeque::new(),
            pending: Vec::new(),
            payload_remaining: 0,
            deferred_reply: None,
            rx: VecDeque::new(),
            max_chunk: usize::MAX,
            written: Vec::new(),
            commands: Vec::new(),
            payloads: Vec::new(),
        }
    }

    /// Answer the next occurrence of `command` (without sentinel) with `reply`.
    ///
    /// Exchanges are consumed in the order they were added. A command that
    /// does not match the head of the script gets no reply.
    pub fn expect(mut self, command: &str, reply: &[u8]) -> Self {
        self.script.push_back(Exchange {
            command: command.to_string(),
            reply: reply.to_vec(),
        });
        self
    }

    /// Limit how many bytes a single read may return.
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk.max(1);
        self
    }

    /// Queue bytes for the host to read without waiting for a command.
    pub fn push_rx(&mut self, data: &[u8]) {
        self.rx.extend(data);
    }

    /// Everything the host wrote, in order.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Commands received so far, without sentinel.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Payloads received after `AT+WRITE` commands.
    pub fn payloads(&self) -> &[Vec<u8>] {
        &self.payloads
    }

    /// Number of reply bytes not yet read.
    pub fn unread_len(&self) -> usize {
        self.rx.len()
    }

    /// Check that every scripted exchange was used.
    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty()
    }

    fn receive(&mut self, byte: u8) {
        if self.payload_remaining > 0 {
            if let Some(payload) = self.payloads.last_mut() {
                payload.push(byte);
            }
            self.payload_remaining -= 1;
            if self.payload_remaining == 0 {
                if let Some(reply) = self.deferred_reply.take() {
                    self.rx.extend(reply);
                }
            }
            return;
        }

        if byte != SENTINEL {
            self.pending.push(byte);
            return;
        }

        let command = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();

        let matches_head = self
            .script
            .front()
            .map_or(false, |exchange| exchange.command == command);
        let reply = if matches_head {
            self.script.pop_front().map(|exchange| exchange.reply)
        } else {
            None
        };

        let payload_len = command
            .strip_prefix("AT+WRITE=")
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        self.commands.push(command);

        if payload_len > 0 {
            self.payloads.push(Vec::with_capacity(payload_len));
            self.payload_remaining = payload_len;
            self.deferred_reply = reply;
        } else if let Some(reply) = reply {
            self.rx.extend(reply);
        }
    }
}

impl Read for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.rx.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no reply pending"));
        }

        let n = buf.len().min(self.max_chunk).min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for ScriptedTransport {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(data);
        for &byte in data {
            self.receive(byte);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_released_on_sentinel() {
        let mut t = ScriptedTransport::new().expect("AT", b"OK\n");
        t.write_all(b"AT").unwrap();
        assert_eq!(t.unread_len(), 0);
        t.write_all(b"#").unwrap();
        assert_eq!(t.unread_len(), 3);
        assert_eq!(t.commands(), ["AT".to_string()]);
        assert!(t.is_exhausted());
    }

    #[test]
    fn test_write_payload_may_contain_sentinel() {
        let mut t = ScriptedTransport::new().expect("AT+WRITE=3", b"OK\n");
        t.write_all(b"AT+WRITE=3#").unwrap();
        assert_eq!(t.unread_len(), 0);
        t.write_all(b"#a#").unwrap();
        assert_eq!(t.payloads(), [b"#a#".to_vec()]);
        assert_eq!(t.unread_len(), 3);
        assert_eq!(t.commands().len(), 1);
    }

    #[test]
    fn test_chunked_reads() {
        let mut t = ScriptedTransport::new().with_max_chunk(2);
        t.push_rx(b"abcde");
        let mut buf = [0u8; 8];
        assert_eq!(t.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
    }

    #[test]
    fn test_empty_reads_time_out() {
        let mut t = ScriptedTransport::new();
        let mut buf = [0u8; 1];
        let err = t.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_unexpected_command_gets_no_reply() {
        let mut t = ScriptedTransport::new().expect("AT", b"OK\n");
        t.write_all(b"AT+DUMP#").unwrap();
        assert_eq!(t.unread_len(), 0);
        assert!(!t.is_exhausted());
    }
}
