//! Byte-level transport abstraction and the serial port adapter

use std::io::{self, Read, Write};

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::debug;

use crate::config::SerialSettings;

/// Blocking, exclusively owned byte link to one rig
///
/// One transaction at a time: callers must not interleave a command exchange
/// with an event poll.
pub trait Transport {
    /// Discard any input received but not yet read
    fn flush_input(&mut self) -> io::Result<()>;

    /// Write all of `bytes`
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read until `terminator` (included) or `max_len` bytes
    ///
    /// Returns an empty vector when no byte arrived before the timeout. A
    /// timeout after some bytes arrived is an [`io::ErrorKind::TimedOut`] error.
    fn read_until(&mut self, terminator: u8, max_len: usize) -> io::Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn flush_input(&mut self) -> io::Result<()> {
        (**self).flush_input()
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn read_until(&mut self, terminator: u8, max_len: usize) -> io::Result<Vec<u8>> {
        (**self).read_until(terminator, max_len)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn flush_input(&mut self) -> io::Result<()> {
        (**self).flush_input()
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn read_until(&mut self, terminator: u8, max_len: usize) -> io::Result<Vec<u8>> {
        (**self).read_until(terminator, max_len)
    }
}

/// [`Transport`] over a real serial port
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open and configure the port: 8 data bits, no parity, no flow control
    pub fn open(settings: &SerialSettings) -> Result<Self, serialport::Error> {
        let stop_bits = match settings.stop_bits {
            1 => StopBits::One,
            2 => StopBits::Two,
            other => {
                return Err(serialport::Error::new(
                    serialport::ErrorKind::InvalidInput,
                    format!("unsupported stop bits: {}", other),
                ))
            }
        };

        let port = serialport::new(&settings.port, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(stop_bits)
            .flow_control(FlowControl::None)
            .timeout(settings.timeout())
            .open()?;

        debug!(
            "Opened {} at {} baud, {} stop bits",
            settings.port, settings.baud_rate, settings.stop_bits
        );
        Ok(Self { port })
    }

    /// Wrap an already opened port
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl Transport for SerialTransport {
    fn flush_input(&mut self) -> io::Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        Write::write_all(&mut self.port, bytes)?;
        self.port.flush()
    }

    fn read_until(&mut self, terminator: u8, max_len: usize) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(max_len);
        let mut byte = [0u8; 1];
        while out.len() < max_len {
            match self.port.read(&mut byte) {
                Ok(0) if out.is_empty() => break,
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(_) => {
                    out.push(byte[0]);
                    if byte[0] == terminator {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut && out.is_empty() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }
}
