/// Commands understood by the SPS30, with their SHDLC command ids and I2C
/// pointer addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start measurement in big-endian float output mode.
    StartMeasurement,
    /// Stop measurement, the sensor returns to idle.
    StopMeasurement,
    /// Run the fan at full speed for a while to blow out dust.
    StartFanCleaning,
    /// Read measured values. Over I2C this pointer also reports readiness.
    ReadMeasurement,
}

/// Data byte for [`Command::StartMeasurement`]: sub-command 0x01 (start),
/// output format 0x03 (big-endian IEEE754 float).
const START_SUBCOMMAND: u8 = 0x01;
const FLOAT_OUTPUT_FORMAT: u8 = 0x03;

impl Command {
    /// SHDLC command id.
    pub fn shdlc_id(self) -> u8 {
        match self {
            Command::StartMeasurement => 0x00,
            Command::StopMeasurement => 0x01,
            Command::StartFanCleaning => 0x56,
            Command::ReadMeasurement => 0x03,
        }
    }

    /// Data bytes carried by the SHDLC command frame.
    pub fn shdlc_data(self) -> &'static [u8] {
        match self {
            Command::StartMeasurement => &[START_SUBCOMMAND, FLOAT_OUTPUT_FORMAT],
            _ => &[],
        }
    }

    /// I2C pointer address.
    pub fn i2c_pointer(self) -> u16 {
        match self {
            Command::StartMeasurement => 0x0010,
            Command::StopMeasurement => 0x0104,
            Command::StartFanCleaning => 0x5607,
            Command::ReadMeasurement => 0x0202,
        }
    }

    /// Data word written after the I2C pointer, if any.
    pub fn i2c_data(self) -> Option<[u8; 2]> {
        match self {
            Command::StartMeasurement => Some([FLOAT_OUTPUT_FORMAT, 0x00]),
            _ => None,
        }
    }
}
