//! Line codec for the AT protocol.
//!
//! Outgoing commands are terminated with the `#` sentinel rather than a
//! newline. Incoming status and diagnostic text arrives as `\n` terminated
//! lines, read one byte at a time so that nothing past the newline is ever
//! taken off the transport.

use bytes::BytesMut;

/// Sentinel byte terminating every outgoing command.
pub const SENTINEL: u8 = b'#';

/// Line terminator for incoming text.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Initial capacity of the line buffer.
pub const MAX_LINE_LENGTH: usize = 128;

/// Accumulates incoming bytes into lines.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Bytes of the line being received.
    buffer: BytesMut,
}

impl LineCodec {
    /// Create a new line codec.
    pub fn new() -> Self {
        LineCodec {
            buffer: BytesMut::with_capacity(MAX_LINE_LENGTH),
        }
    }

    /// Feed one received byte.
    ///
    /// Returns the completed line (without the `\n`) when `byte` is the line
    /// terminator, or `None` if the line is still incomplete.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        if byte == LINE_TERMINATOR {
            let line = self.buffer.split();
            return Some(String::from_utf8_lossy(&line).into_owned());
        }
        self.buffer.extend_from_slice(&[byte]);
        None
    }

    /// Encode a command for transmission.
    ///
    /// Appends exactly one sentinel; the text itself is not escaped.
    pub fn encode_command(cmd: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(cmd.len() + 1);
        buf.extend_from_slice(cmd.as_bytes());
        buf.push(SENTINEL);
        buf
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partially received line.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the current buffer contents as a string (for debugging).
    pub fn buffer_as_str(&self) -> String {
        String::from_utf8_lossy(&self.buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_all(codec: &mut LineCodec, data: &[u8]) -> Vec<String> {
        data.iter().filter_map(|&b| codec.push(b)).collect()
    }

    #[test]
    fn test_encode_command() {
        assert_eq!(LineCodec::encode_command("AT"), b"AT#");
        assert_eq!(LineCodec::encode_command("AT+RATE=1"), b"AT+RATE=1#");
    }

    #[test]
    fn test_line_split() {
        let mut codec = LineCodec::new();
        let lines = push_all(&mut codec, b"line1\nline2\n");
        assert_eq!(lines, vec!["line1".to_string(), "line2".to_string()]);
        assert_eq!(codec.buffered_len(), 0);
    }

    #[test]
    fn test_partial_line() {
        let mut codec = LineCodec::new();
        assert!(push_all(&mut codec, b"OK").is_empty());
        assert_eq!(codec.buffer_as_str(), "OK");

        assert_eq!(codec.push(b'\n'), Some("OK".to_string()));
    }

    #[test]
    fn test_empty_line() {
        let mut codec = LineCodec::new();
        assert_eq!(codec.push(b'\n'), Some(String::new()));
    }

    #[test]
    fn test_carriage_return_is_kept() {
        let mut codec = LineCodec::new();
        let lines = push_all(&mut codec, b"OK\r\n");
        assert_eq!(lines, vec!["OK\r".to_string()]);
    }

    #[test]
    fn test_clear() {
        let mut codec = LineCodec::new();
        push_all(&mut codec, b"garbage");
        codec.clear();
        assert_eq!(codec.push(b'\n'), Some(String::new()));
    }
}
