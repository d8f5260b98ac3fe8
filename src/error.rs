/// Why a measurement read produced no record.
///
/// None of these are fatal; the driver stays usable after any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum ReadFailure {
    /// The serial port had nothing queued.
    #[cfg_attr(feature = "thiserror", error("no data available"))]
    NoDataAvailable,
    /// The first queued byte was not a start marker; the buffer was flushed.
    #[cfg_attr(feature = "thiserror", error("lost frame sync, buffer discarded"))]
    Resynchronizing,
    /// Not enough bytes queued yet for a full frame; nothing was consumed.
    #[cfg_attr(feature = "thiserror", error("incomplete frame"))]
    IncompleteFrame,
    /// The sensor reported a non-zero state byte.
    #[cfg_attr(feature = "thiserror", error("sensor fault 0x{0:02x}"))]
    SensorFault(u8),
    /// A frame checksum or word CRC did not match.
    #[cfg_attr(feature = "thiserror", error("checksum mismatch"))]
    ChecksumMismatch,
    /// Wrong stop marker, unknown escape sequence or truncated frame.
    #[cfg_attr(feature = "thiserror", error("framing error"))]
    FramingError,
    /// An I2C read returned the wrong number of bytes.
    #[cfg_attr(
        feature = "thiserror",
        error("expected {expected} bytes, got {actual}")
    )]
    TransactionSizeMismatch { expected: usize, actual: usize },
    /// The sensor has no new measurement pending.
    #[cfg_attr(feature = "thiserror", error("data not ready"))]
    NotReady,
}

/// SPS30 errors
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum Error<E> {
    /// The transport itself failed.
    #[cfg_attr(feature = "thiserror", error("transport error: {0:?}"))]
    Io(E),
    /// The transport worked but the data was unusable.
    #[cfg_attr(feature = "thiserror", error("read failed: {0}"))]
    Read(ReadFailure),
}

impl<E> From<ReadFailure> for Error<E> {
    fn from(failure: ReadFailure) -> Self {
        Error::Read(failure)
    }
}

impl<E> Error<E> {
    /// The read failure, if this is not a transport error.
    pub fn read_failure(&self) -> Option<ReadFailure> {
        match self {
            Error::Read(failure) => Some(*failure),
            Error::Io(_) => None,
        }
    }
}
