/// CRC-8 over one 2-byte I2C data word (polynomial 0x31, init 0xFF).
pub fn crc8(word: &[u8; 2]) -> u8 {
    sensirion_i2c::crc8::calculate(word)
}

/// SHDLC frame checksum: the inverted low byte of the sum of all bytes.
///
/// Computed over the de-stuffed address, command, (state,) length and data
/// bytes. Start/stop markers and the checksum byte itself are excluded.
pub fn frame_checksum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

#[cfg(test)]
mod tests {
    use super::{crc8, frame_checksum};

    #[test]
    fn example() {
        assert_eq!(crc8(&[0xbe, 0xef]), 0x92);
    }

    #[test]
    fn reference_words() {
        assert_eq!(crc8(&[0x00, 0x00]), 0x81);
        assert_eq!(crc8(&[0x00, 0x01]), 0xb0);
        assert_eq!(crc8(&[0x03, 0x00]), 0xac);
    }

    /// Bitwise CRC-8 as described in the datasheet.
    fn bitwise_crc8(word: &[u8; 2]) -> u8 {
        let mut crc: u8 = 0xff;
        for byte in word.iter().copied() {
            crc ^= byte;
            for _ in 0..8 {
                if crc & 0x80 == 0 {
                    crc <<= 1;
                } else {
                    crc = (crc << 1) ^ 0x31;
                }
            }
        }
        crc
    }

    #[test]
    fn matches_bitwise_definition() {
        for word in [[0xbe, 0xef], [0x41, 0x20], [0x3f, 0x80], [0xff, 0xff], [0x00, 0x10]] {
            assert_eq!(crc8(&word), bitwise_crc8(&word));
        }
    }

    #[test]
    fn zero_payload_checksum() {
        assert_eq!(frame_checksum(&[0u8; 44]), 0xff);
        assert_eq!(frame_checksum(&[]), 0xff);
    }

    #[test]
    fn command_frame_checksums() {
        // start, stop, clean and read-data frames as sent on the wire
        assert_eq!(frame_checksum(&[0x00, 0x00, 0x02, 0x01, 0x03]), 0xf9);
        assert_eq!(frame_checksum(&[0x00, 0x01, 0x00]), 0xfe);
        assert_eq!(frame_checksum(&[0x00, 0x56, 0x00]), 0xa9);
        assert_eq!(frame_checksum(&[0x00, 0x03, 0x00]), 0xfc);
    }

    #[test]
    fn sum_wraps() {
        assert_eq!(frame_checksum(&[0xff, 0x02]), !0x01);
    }
}
