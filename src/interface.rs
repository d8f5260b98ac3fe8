use embedded_hal::delay::DelayNs;

use crate::commands::Command;
use crate::error::Error;
use crate::types::MeasurementRecord;

/// A byte-oriented serial link, typically a UART with a receive buffer.
pub trait SerialPort {
    type Error;

    /// Writes all bytes to the link.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads up to `buf.len()` already-queued bytes and returns how many were
    /// read. Returns 0 when nothing is queued.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Number of bytes queued for reading.
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// The next queued byte, without consuming it.
    fn peek(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Reads and drops up to `max` queued bytes, returning how many were
    /// dropped.
    fn discard(&mut self, max: usize) -> Result<usize, Self::Error> {
        let mut scratch = [0u8; 16];
        let mut dropped = 0;
        while dropped < max {
            let chunk = (max - dropped).min(scratch.len());
            let n = self.receive(&mut scratch[..chunk])?;
            if n == 0 {
                break;
            }
            dropped += n;
        }
        Ok(dropped)
    }
}

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// A physical link to the sensor. Implemented by
/// [`UartInterface`](crate::uart::UartInterface) and
/// [`I2cInterface`](crate::i2c::I2cInterface); the driver picks one at
/// construction.
pub trait Interface {
    type Error;

    /// Sends `command` and waits for it to take effect.
    fn execute<D: DelayNs>(
        &mut self,
        command: Command,
        delay: &mut D,
    ) -> Result<(), Error<Self::Error>>;

    /// Runs one complete read cycle, yielding a validated record or the
    /// reason there is none.
    fn read_measurement(&mut self) -> Result<MeasurementRecord, Error<Self::Error>>;
}
