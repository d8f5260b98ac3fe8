use embedded_hal::delay::DelayNs;

use crate::commands::Command;
use crate::error::{Error, ReadFailure};
use crate::interface::{Interface, SerialPort};
use crate::shdlc::{self, MAX_FRAME_LEN, SLAVE_ADDRESS};
use crate::types::MeasurementRecord;

/// Time the sensor needs to answer a command frame.
const RESPONSE_DELAY_MS: u32 = 100;
/// Length of the sensor's reply to a command that returns no data.
const COMMAND_RESPONSE_LEN: usize = 7;

/// SPS30 over UART, speaking SHDLC.
pub struct UartInterface<S> {
    port: S,
}

impl<S: SerialPort> UartInterface<S> {
    pub fn new(port: S) -> Self {
        Self { port }
    }

    /// Gives back the serial port.
    pub fn release(self) -> S {
        self.port
    }

    fn send_frame(&mut self, command: Command) -> Result<(), Error<S::Error>> {
        let mut frame = [0u8; MAX_FRAME_LEN];
        let len = shdlc::encode_frame(
            SLAVE_ADDRESS,
            command.shdlc_id(),
            command.shdlc_data(),
            &mut frame,
        )
        .ok_or(Error::Read(ReadFailure::FramingError))?;
        trace!("uart: sending {} ({} bytes)", command, len);
        self.port.send(&frame[..len]).map_err(Error::Io)
    }
}

impl<S: SerialPort> Interface for UartInterface<S> {
    type Error = S::Error;

    fn execute<D: DelayNs>(
        &mut self,
        command: Command,
        delay: &mut D,
    ) -> Result<(), Error<Self::Error>> {
        self.send_frame(command)?;
        delay.delay_ms(RESPONSE_DELAY_MS);
        self.port
            .discard(COMMAND_RESPONSE_LEN)
            .map_err(Error::Io)?;
        Ok(())
    }

    /// Requests fresh values, then decodes whatever response is already
    /// buffered. When the sensor answers slower than it is polled, this is
    /// the answer to the previous request.
    fn read_measurement(&mut self) -> Result<MeasurementRecord, Error<Self::Error>> {
        self.send_frame(Command::ReadMeasurement)?;
        shdlc::read_measurement_response(&mut self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shdlc::tests::{response, FakePort};
    use crate::types::sample_record;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn start_measurement_frame() {
        let mut uart = UartInterface::new(FakePort::with_rx(&[
            0x7e, 0x00, 0x00, 0x00, 0x00, 0xff, 0x7e, 0xaa,
        ]));
        uart.execute(Command::StartMeasurement, &mut NoopDelay::new())
            .unwrap();
        let port = uart.release();
        assert_eq!(port.tx, [0x7e, 0x00, 0x00, 0x02, 0x01, 0x03, 0xf9, 0x7e]);
        // only the seven response bytes are drained
        assert_eq!(port.rx.len(), 1);
    }

    #[test]
    fn stop_and_clean_frames() {
        let mut uart = UartInterface::new(FakePort::default());
        let mut delay = NoopDelay::new();
        uart.execute(Command::StopMeasurement, &mut delay).unwrap();
        uart.execute(Command::StartFanCleaning, &mut delay).unwrap();
        assert_eq!(
            uart.release().tx,
            [0x7e, 0x00, 0x01, 0x00, 0xfe, 0x7e, 0x7e, 0x00, 0x56, 0x00, 0xa9, 0x7e]
        );
    }

    #[test]
    fn read_sends_request_then_decodes() {
        let record = sample_record();
        let mut uart = UartInterface::new(FakePort::with_rx(&response(&record.to_be_bytes())));
        assert_eq!(uart.read_measurement(), Ok(record));
        assert_eq!(uart.release().tx, [0x7e, 0x00, 0x03, 0x00, 0xfc, 0x7e]);
    }

    #[test]
    fn read_without_response() {
        let mut uart = UartInterface::new(FakePort::default());
        assert_eq!(
            uart.read_measurement(),
            Err(Error::Read(ReadFailure::NoDataAvailable))
        );
    }
}
