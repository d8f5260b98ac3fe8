//! SHDLC framing used by the SPS30 UART interface.
//!
//! A frame is `START | ADDR | CMD | (STATE) | LEN | DATA.. | CHK | STOP`, where
//! STATE only appears in sensor responses. Between the markers every reserved
//! byte is replaced by [`ESCAPE`] followed by a substitute byte.

use crate::crc::frame_checksum;
use crate::error::{Error, ReadFailure};
use crate::interface::SerialPort;
use crate::types::{MeasurementRecord, MEASUREMENT_LEN};

/// Frame start and stop marker.
pub const FRAME_MARKER: u8 = 0x7E;
/// Escape marker for byte stuffing.
pub const ESCAPE: u8 = 0x7D;
/// The sensor's SHDLC slave address.
pub const SLAVE_ADDRESS: u8 = 0x00;

/// Reserved bytes and the substitutes sent in their place after [`ESCAPE`].
const SUBSTITUTIONS: [(u8, u8); 4] = [(0x7E, 0x5E), (0x7D, 0x5D), (0x11, 0x31), (0x13, 0x33)];

/// Bytes flushed from the port when a frame has to be thrown away.
pub const DISCARD_LEN: usize = 60;
/// Smallest number of queued bytes that can hold a measurement response.
pub const MIN_RESPONSE_LEN: usize = 47;
/// Start marker, address, command, state and length.
const HEADER_LEN: usize = 5;
const STATE_INDEX: usize = 3;

/// Longest data field [`encode_frame`] is used with.
pub const MAX_DATA_LEN: usize = 8;
/// Output size that fits any frame with up to [`MAX_DATA_LEN`] data bytes,
/// even if every byte needs stuffing.
pub const MAX_FRAME_LEN: usize = 2 + 2 * (3 + MAX_DATA_LEN + 1);

/// Substitute for a reserved byte, or `None` if `byte` goes out unchanged.
pub fn stuff_byte(byte: u8) -> Option<u8> {
    SUBSTITUTIONS
        .iter()
        .find(|(reserved, _)| *reserved == byte)
        .map(|(_, substitute)| *substitute)
}

/// Original value of the byte following an [`ESCAPE`].
pub fn unstuff_byte(substitute: u8) -> Result<u8, ReadFailure> {
    SUBSTITUTIONS
        .iter()
        .find(|(_, s)| *s == substitute)
        .map(|(reserved, _)| *reserved)
        .ok_or(ReadFailure::FramingError)
}

/// Builds a command frame into `out` and returns its length, or `None` if
/// `out` is too small.
pub fn encode_frame(address: u8, command: u8, data: &[u8], out: &mut [u8]) -> Option<usize> {
    if data.len() > MAX_DATA_LEN {
        return None;
    }
    let mut body = [0u8; 3 + MAX_DATA_LEN + 1];
    body[..3].copy_from_slice(&[address, command, data.len() as u8]);
    body[3..3 + data.len()].copy_from_slice(data);
    let checksum_at = 3 + data.len();
    body[checksum_at] = frame_checksum(&body[..checksum_at]);

    let mut writer = FrameWriter { out, pos: 0 };
    writer.raw(FRAME_MARKER)?;
    for byte in &body[..=checksum_at] {
        writer.stuffed(*byte)?;
    }
    writer.raw(FRAME_MARKER)?;
    Some(writer.pos)
}

struct FrameWriter<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl FrameWriter<'_> {
    fn raw(&mut self, byte: u8) -> Option<()> {
        let slot = self.out.get_mut(self.pos)?;
        *slot = byte;
        self.pos += 1;
        Some(())
    }

    fn stuffed(&mut self, byte: u8) -> Option<()> {
        match stuff_byte(byte) {
            Some(substitute) => {
                self.raw(ESCAPE)?;
                self.raw(substitute)
            }
            None => self.raw(byte),
        }
    }
}

/// Decodes one measurement response frame from `port`.
///
/// Frames that can never become valid are flushed from the port; a frame that
/// is merely still arriving is left in place for the next attempt.
pub fn read_measurement_response<S: SerialPort>(
    port: &mut S,
) -> Result<MeasurementRecord, Error<S::Error>> {
    let available = port.bytes_available().map_err(Error::Io)?;
    if available == 0 {
        return Err(ReadFailure::NoDataAvailable.into());
    }

    if port.peek().map_err(Error::Io)? != Some(FRAME_MARKER) {
        return flush(port, ReadFailure::Resynchronizing);
    }

    if available < MIN_RESPONSE_LEN {
        return Err(ReadFailure::IncompleteFrame.into());
    }

    match decode_frame_body(port) {
        Ok(payload) => Ok(MeasurementRecord::from_be_bytes(&payload)),
        Err(Error::Read(failure)) => flush(port, failure),
        Err(e) => Err(e),
    }
}

fn decode_frame_body<S: SerialPort>(
    port: &mut S,
) -> Result<[u8; MEASUREMENT_LEN], Error<S::Error>> {
    let mut header = [0u8; HEADER_LEN];
    for slot in header.iter_mut() {
        *slot = next_byte(port)?;
    }
    let state = header[STATE_INDEX];
    if state != 0 {
        return Err(ReadFailure::SensorFault(state).into());
    }

    let mut payload = [0u8; MEASUREMENT_LEN];
    for slot in payload.iter_mut() {
        *slot = next_unstuffed(port)?;
    }

    let received = next_unstuffed(port)?;
    if next_byte(port)? != FRAME_MARKER {
        return Err(ReadFailure::FramingError.into());
    }

    // address, command, state and length are covered along with the payload
    let mut covered = [0u8; HEADER_LEN - 1 + MEASUREMENT_LEN];
    covered[..HEADER_LEN - 1].copy_from_slice(&header[1..]);
    covered[HEADER_LEN - 1..].copy_from_slice(&payload);
    if frame_checksum(&covered) != received {
        return Err(ReadFailure::ChecksumMismatch.into());
    }

    Ok(payload)
}

fn next_byte<S: SerialPort>(port: &mut S) -> Result<u8, Error<S::Error>> {
    let mut byte = [0u8];
    match port.receive(&mut byte).map_err(Error::Io)? {
        0 => Err(ReadFailure::FramingError.into()),
        _ => Ok(byte[0]),
    }
}

fn next_unstuffed<S: SerialPort>(port: &mut S) -> Result<u8, Error<S::Error>> {
    match next_byte(port)? {
        ESCAPE => Ok(unstuff_byte(next_byte(port)?)?),
        byte => Ok(byte),
    }
}

fn flush<S: SerialPort, T>(port: &mut S, failure: ReadFailure) -> Result<T, Error<S::Error>> {
    let dropped = port.discard(DISCARD_LEN).map_err(Error::Io)?;
    trace!("shdlc: flushed {} bytes after {}", dropped, failure);
    Err(failure.into())
}
