//! Serial port transport for USB and Bluetooth-SPP ELM327 adapters.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::info;

use crate::error::Error;
use crate::transport::{Chunk, Transport};

/// Baud rate the ELM327 uses out of the box.
pub const DEFAULT_BAUD_RATE: u32 = 38400;
const READ_TIMEOUT_MS: u64 = 100;
const READ_BUFFER_SIZE: usize = 256;

/// Transport over a local serial device, 8N1 with no flow control (the adapter
/// defaults). The OS handle is exclusive and released on drop.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the device at `path` at the default 38400 baud.
    pub fn open(path: &str) -> Result<SerialTransport, Error> {
        SerialTransport::open_with_baud_rate(path, DEFAULT_BAUD_RATE)
    }

    /// Open the device at `path` at a custom baud rate, for adapters reconfigured
    /// with `ATBRD`.
    pub fn open_with_baud_rate(path: &str, baud_rate: u32) -> Result<SerialTransport, Error> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()?;

        info!("Opened {} at {} baud", path, baud_rate);
        Ok(SerialTransport { port })
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), Error> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    fn read(&mut self) -> Result<Chunk, Error> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(Chunk { data: vec![], eof: true }),
            Ok(n) => Ok(Chunk { data: buf[..n].to_vec(), eof: false }),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Chunk::default()),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(Chunk::default()),
            Err(e) => Err(e.into()),
        }
    }
}
