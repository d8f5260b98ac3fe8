use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::commands::Command;
use crate::crc::crc8;
use crate::error::{Error, ReadFailure};
use crate::interface::Interface;
use crate::types::{MeasurementRecord, MEASUREMENT_LEN};

/// SPS30 I2C address.
pub const ADDRESS: u8 = 0x69;

/// Data-ready flag: one word plus CRC.
pub const READY_LEN: usize = 3;
/// Measured values: twenty words, each followed by its CRC.
pub const MEASUREMENT_READ_LEN: usize = MEASUREMENT_LEN / 2 * 3;

/// Checks a data-ready response. Anything other than a correctly
/// checksummed `0x0001` counts as not ready.
pub fn decode_ready(response: &[u8]) -> Result<(), ReadFailure> {
    match response {
        [0x00, 0x01, crc] if crc8(&[0x00, 0x01]) == *crc => Ok(()),
        _ => Err(ReadFailure::NotReady),
    }
}

/// Decodes a measured-values response, validating every word's CRC.
///
/// A single bad word rejects the whole response.
pub fn decode_measurement(response: &[u8]) -> Result<MeasurementRecord, ReadFailure> {
    if response.len() != MEASUREMENT_READ_LEN {
        return Err(ReadFailure::TransactionSizeMismatch {
            expected: MEASUREMENT_READ_LEN,
            actual: response.len(),
        });
    }

    let mut data = [0u8; MEASUREMENT_LEN];
    for (word, chunk) in data.chunks_exact_mut(2).zip(response.chunks_exact(3)) {
        let received = [chunk[0], chunk[1]];
        if crc8(&received) != chunk[2] {
            return Err(ReadFailure::ChecksumMismatch);
        }
        word.copy_from_slice(&received);
    }
    Ok(MeasurementRecord::from_be_bytes(&data))
}

/// SPS30 over I2C.
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> I2cInterface<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Gives back the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_pointer(&mut self, command: Command, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write_read(ADDRESS, &command.i2c_pointer().to_be_bytes(), buf)
            .map_err(Error::Io)
    }
}

impl<I2C: I2c> Interface for I2cInterface<I2C> {
    type Error = I2C::Error;

    fn execute<D: DelayNs>(
        &mut self,
        command: Command,
        _delay: &mut D,
    ) -> Result<(), Error<Self::Error>> {
        trace!("i2c: sending {}", command);
        match command.i2c_data() {
            Some(word) => {
                let [pointer_hi, pointer_lo] = command.i2c_pointer().to_be_bytes();
                let frame = [pointer_hi, pointer_lo, word[0], word[1], crc8(&word)];
                self.i2c.write(ADDRESS, &frame).map_err(Error::Io)
            }
            None => sensirion_i2c::i2c::write_command_u16(
                &mut self.i2c,
                ADDRESS,
                command.i2c_pointer(),
            )
            .map_err(Error::Io),
        }
    }

    fn read_measurement(&mut self) -> Result<MeasurementRecord, Error<Self::Error>> {
        let mut ready = [0u8; READY_LEN];
        self.read_pointer(Command::ReadMeasurement, &mut ready)?;
        decode_ready(&ready)?;

        let mut values = [0u8; MEASUREMENT_READ_LEN];
        self.read_pointer(Command::ReadMeasurement, &mut values)?;
        decode_measurement(&values).map_err(Error::Read)
    }
}
