//! Byte-stream transport abstraction and the real serial implementation.
//!
//! The engine only needs a blocking duplex byte stream with a bounded read;
//! everything serial-specific (enumeration, exclusivity, baud) stays here.

use std::io;
use std::io::{Read, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A blocking, timeout-bounded duplex byte stream.
///
/// `read` waits at most the configured read timeout and returns `Ok(0)`
/// when it expires with no data, so callers can distinguish "nothing yet"
/// from a transport failure.
pub trait Transport {
    /// Write the whole buffer.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read whatever is available, waiting up to the read timeout.
    /// Returns `Ok(0)` on timeout.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Change the read timeout for subsequent reads.
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Discard any buffered input (stale payload, old responses).
    fn clear_input(&mut self) -> io::Result<()>;
}

/// Serial port settings for a radio session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Baud rate; SiK radios default to 57600.
    pub baud_rate: u32,
    /// Read timeout for a single blocking read.
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baud_rate: 57_600,
            read_timeout: Duration::from_secs(1),
        }
    }
}

/// A real serial port, opened exclusively.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    /// Open `path` with the given settings.
    ///
    /// The port is opened exclusively where the platform supports it, so a
    /// second session against the same port fails fast instead of
    /// interleaving traffic.
    pub fn open(path: &str, config: &SerialConfig) -> io::Result<SerialTransport> {
        debug!("opening {} at {} baud", path, config.baud_rate);
        let port = serialport::new(path, config.baud_rate)
            .timeout(config.read_timeout)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .open()
            .map_err(io::Error::other)?;
        Ok(SerialTransport { port })
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)?;
        self.port.flush()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port.set_timeout(timeout).map_err(io::Error::other)
    }

    fn clear_input(&mut self) -> io::Result<()> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(io::Error::other)
    }
}

/// Information about a detected serial port.
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Device path (e.g. `/dev/ttyUSB0`, `COM3`).
    pub name: String,
    /// Human-readable description, when the platform provides one.
    pub description: Option<String>,
}

/// List serial ports present on the system, for auto-detection.
pub fn available_ports() -> io::Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().map_err(io::Error::other)?;
    Ok(ports
        .into_iter()
        .map(|p| {
            let description = match p.port_type {
                serialport::SerialPortType::UsbPort(usb) => usb.product,
                _ => None,
            };
            PortInfo {
                name: p.port_name,
                description,
            }
        })
        .collect())
}
