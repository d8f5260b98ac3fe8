/// One step of the power-cycle recovery sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoveryStep {
    PowerOff,
    PowerOn,
    Clean,
    /// Wait for the sensor to settle, in milliseconds.
    Settle(u32),
}

/// Power-cycle and clean, in the order the sensor needs. Each wait is its own
/// step so an async executor can replay the sequence with its own timer.
pub const RECOVERY_SEQUENCE: [RecoveryStep; 6] = [
    RecoveryStep::PowerOff,
    RecoveryStep::Settle(2000),
    RecoveryStep::PowerOn,
    RecoveryStep::Settle(100),
    RecoveryStep::Clean,
    RecoveryStep::Settle(2000),
];

impl RecoveryStep {
    pub fn is_wait(self) -> bool {
        matches!(self, RecoveryStep::Settle(_))
    }
}

/// Total time the recovery sequence spends waiting.
pub fn recovery_duration_ms() -> u32 {
    RECOVERY_SEQUENCE
        .iter()
        .map(|step| match step {
            RecoveryStep::Settle(ms) => *ms,
            _ => 0,
        })
        .sum()
}
