//! Read success/failure bookkeeping that decides when the link is healthy
//! and when the sensor needs a power cycle.

/// Consecutive failed reads after which the link counts as degraded.
pub const DEFAULT_DEGRADED_AFTER: u32 = 5;

/// Link condition as seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No successful read since startup.
    Initializing,
    /// The latest streak of failures, if any, is still short.
    Healthy,
    /// Too many consecutive failures.
    Degraded,
}

/// Snapshot of the link's read history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkHealth {
    pub consecutive_bad_reads: u32,
    /// Clock time of the last good read, or of the last recovery.
    pub last_good_ms: u64,
    /// Starts at 1 and counts every good read from there.
    pub total_good_reads: u32,
    pub state: LinkState,
}

impl LinkHealth {
    pub fn new(now_ms: u64) -> Self {
        Self {
            consecutive_bad_reads: 0,
            last_good_ms: now_ms,
            total_good_reads: 1,
            state: LinkState::Initializing,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.state == LinkState::Healthy
    }

    /// Milliseconds since the last good read.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_good_ms)
    }

    pub(crate) fn record_success(&mut self, now_ms: u64) {
        self.consecutive_bad_reads = 0;
        self.total_good_reads = self.total_good_reads.saturating_add(1);
        self.last_good_ms = now_ms;
        self.state = LinkState::Healthy;
    }

    /// Counts a failed read. The state only changes once the streak reaches
    /// `degraded_after`.
    pub(crate) fn record_failure(&mut self, degraded_after: u32) {
        self.consecutive_bad_reads = self.consecutive_bad_reads.saturating_add(1);
        if self.consecutive_bad_reads >= degraded_after {
            self.state = LinkState::Degraded;
        }
    }

    /// Restarts the staleness clock without touching the link state.
    pub(crate) fn restart_staleness_clock(&mut self, now_ms: u64) {
        self.last_good_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_initializing() {
        let health = LinkHealth::new(42);
        assert_eq!(health.state, LinkState::Initializing);
        assert!(!health.is_healthy());
        assert_eq!(health.total_good_reads, 1);
        assert_eq!(health.consecutive_bad_reads, 0);
        assert_eq!(health.age_ms(100), 58);
    }

    #[test]
    fn fifth_failure_degrades() {
        let mut health = LinkHealth::new(0);
        health.record_success(10);
        for _ in 0..4 {
            health.record_failure(DEFAULT_DEGRADED_AFTER);
        }
        assert_eq!(health.consecutive_bad_reads, 4);
        assert!(health.is_healthy());

        health.record_failure(DEFAULT_DEGRADED_AFTER);
        assert_eq!(health.state, LinkState::Degraded);

        health.record_failure(DEFAULT_DEGRADED_AFTER);
        assert_eq!(health.consecutive_bad_reads, 6);
        assert_eq!(health.state, LinkState::Degraded);
    }

    #[test]
    fn success_recovers_from_degraded() {
        let mut health = LinkHealth::new(0);
        for _ in 0..7 {
            health.record_failure(DEFAULT_DEGRADED_AFTER);
        }
        health.record_success(500);
        assert!(health.is_healthy());
        assert_eq!(health.consecutive_bad_reads, 0);
        assert_eq!(health.total_good_reads, 2);
        assert_eq!(health.last_good_ms, 500);
    }

    #[test]
    fn staleness_restart_keeps_state() {
        let mut health = LinkHealth::new(0);
        for _ in 0..5 {
            health.record_failure(DEFAULT_DEGRADED_AFTER);
        }
        health.restart_staleness_clock(900);
        assert_eq!(health.state, LinkState::Degraded);
        assert_eq!(health.age_ms(1000), 100);
        assert_eq!(health.age_ms(10), 0);
    }
}
