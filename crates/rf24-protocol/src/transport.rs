//! Byte transport used by the driver.

use std::io::{self, Read, Write};

/// A blocking byte stream to the bridge.
///
/// Reads are expected to be bounded by a timeout: a read that times out with
/// no data reports either `Ok(0)` or an error of kind `TimedOut`.
///
/// Any `Read + Write` type is a transport, including
/// `Box<dyn serialport::SerialPort>`.
pub trait Transport {
    /// Write some bytes, returning how many were accepted.
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes, returning how many were read.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Flush buffered output.
    fn flush(&mut self) -> io::Result<()>;

    /// Write all of `data`.
    fn write_all_bytes(&mut self, mut data: &[u8]) -> io::Result<()> {
        while !data.is_empty() {
            match self.write_bytes(data) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "transport accepted no bytes",
                    ))
                }
                Ok(n) => data = &data[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<T: Read + Write + ?Sized> Transport for T {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        Write::write(self, data)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

/// Check if a read error only means that no data arrived in time.
pub fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
