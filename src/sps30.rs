use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::commands::Command;
use crate::error::Error;
use crate::health::{LinkHealth, LinkState, DEFAULT_DEGRADED_AFTER};
use crate::i2c::I2cInterface;
use crate::interface::{Clock, Interface, SerialPort};
use crate::recovery::{recovery_duration_ms, RecoveryStep, RECOVERY_SEQUENCE};
use crate::types::MeasurementRecord;
use crate::uart::UartInterface;

/// Default time without a good read before the sensor is power cycled.
pub const DEFAULT_RESET_THRESHOLD_MS: u64 = 1_200_000;

/// Settle time between power-on and the first clean in [`Sps30::initialize`].
const STARTUP_SETTLE_MS: u32 = 100;

/// Recovery policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Age of the last good read at which a failed read triggers a power
    /// cycle.
    pub reset_threshold_ms: u64,
    /// Consecutive failures after which the link is degraded.
    pub degraded_after: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reset_threshold_ms: DEFAULT_RESET_THRESHOLD_MS,
            degraded_after: DEFAULT_DEGRADED_AFTER,
        }
    }
}

/// SPS30 driver.
///
/// Owns the sensor interface, a delay provider and a clock. Every call to
/// [`attempt_read`](Sps30::attempt_read) updates the link health exactly once
/// and power cycles the sensor if no good read arrived for too long.
pub struct Sps30<IF, D, C> {
    interface: IF,
    delay: D,
    clock: C,
    config: Config,
    health: LinkHealth,
    last_measurement: Option<MeasurementRecord>,
    fan_active: bool,
}

impl<S, D, C> Sps30<UartInterface<S>, D, C>
where
    S: SerialPort,
    D: DelayNs,
    C: Clock,
{
    /// Creates a driver talking SHDLC over a serial port.
    pub fn new_uart(port: S, delay: D, clock: C) -> Self {
        Self::new(UartInterface::new(port), delay, clock)
    }
}

impl<I2C, D, C> Sps30<I2cInterface<I2C>, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Creates a driver on an I2C bus.
    pub fn new_i2c(i2c: I2C, delay: D, clock: C) -> Self {
        Self::new(I2cInterface::new(i2c), delay, clock)
    }
}

impl<IF, D, C> Sps30<IF, D, C>
where
    IF: Interface,
    D: DelayNs,
    C: Clock,
{
    pub fn new(interface: IF, delay: D, clock: C) -> Self {
        Self::with_config(interface, delay, clock, Config::default())
    }

    pub fn with_config(interface: IF, delay: D, clock: C, config: Config) -> Self {
        let health = LinkHealth::new(clock.now_ms());
        Self {
            interface,
            delay,
            clock,
            config,
            health,
            last_measurement: None,
            // the sensor powers up measuring
            fan_active: true,
        }
    }

    /// Resets the link health, starts measuring and cleans the fan.
    ///
    /// The configured reset threshold is kept.
    pub fn initialize(&mut self) -> Result<(), Error<IF::Error>> {
        self.health = LinkHealth::new(self.clock.now_ms());
        self.power_on()?;
        self.delay.delay_ms(STARTUP_SETTLE_MS);
        self.clean()
    }

    /// Starts measurement mode.
    pub fn power_on(&mut self) -> Result<(), Error<IF::Error>> {
        self.interface
            .execute(Command::StartMeasurement, &mut self.delay)?;
        self.fan_active = true;
        Ok(())
    }

    /// Stops measurement, the sensor idles with its fan off.
    pub fn power_off(&mut self) -> Result<(), Error<IF::Error>> {
        self.interface
            .execute(Command::StopMeasurement, &mut self.delay)?;
        self.fan_active = false;
        Ok(())
    }

    /// Starts a fan cleaning cycle.
    pub fn clean(&mut self) -> Result<(), Error<IF::Error>> {
        self.interface
            .execute(Command::StartFanCleaning, &mut self.delay)
    }

    /// Runs one read cycle.
    ///
    /// A failure is returned as-is after it has been counted. If the last
    /// good read is older than the reset threshold, the sensor is power
    /// cycled before this returns; should that fail, the transport error is
    /// returned instead and the next failed read retries the recovery.
    pub fn attempt_read(&mut self) -> Result<MeasurementRecord, Error<IF::Error>> {
        match self.interface.read_measurement() {
            Ok(record) => {
                let previous = self.health.state;
                self.health.record_success(self.clock.now_ms());
                if previous != LinkState::Healthy {
                    info!(
                        "sps30: link healthy ({} good reads)",
                        self.health.total_good_reads
                    );
                }
                self.last_measurement = Some(record);
                Ok(record)
            }
            Err(e) => {
                if let Some(failure) = e.read_failure() {
                    debug!("sps30: read failed: {}", failure);
                } else {
                    warn!("sps30: transport error during read");
                }
                self.handle_failure()?;
                Err(e)
            }
        }
    }

    fn handle_failure(&mut self) -> Result<(), Error<IF::Error>> {
        let previous = self.health.state;
        self.health.record_failure(self.config.degraded_after);
        if previous != LinkState::Degraded && self.health.state == LinkState::Degraded {
            warn!(
                "sps30: link degraded after {} bad reads",
                self.health.consecutive_bad_reads
            );
        }

        let age = self.health.age_ms(self.clock.now_ms());
        if age >= self.config.reset_threshold_ms {
            warn!("sps30: no good read for {} ms, power cycling", age);
            self.recover()?;
        }
        Ok(())
    }

    fn recover(&mut self) -> Result<(), Error<IF::Error>> {
        for step in RECOVERY_SEQUENCE {
            match step {
                RecoveryStep::PowerOff => self.power_off()?,
                RecoveryStep::PowerOn => self.power_on()?,
                RecoveryStep::Clean => self.clean()?,
                RecoveryStep::Settle(ms) => self.delay.delay_ms(ms),
            }
        }
        self.health.restart_staleness_clock(self.clock.now_ms());
        info!(
            "sps30: power cycle done ({} ms of settling)",
            recovery_duration_ms()
        );
        Ok(())
    }

    /// Copy of the current link health.
    pub fn current_health(&self) -> LinkHealth {
        self.health
    }

    pub fn is_healthy(&self) -> bool {
        self.health.is_healthy()
    }

    /// Good reads so far, starting from 1.
    pub fn total_good_reads(&self) -> u32 {
        self.health.total_good_reads
    }

    /// Milliseconds since the last good read or recovery.
    pub fn last_good_age_ms(&self) -> u64 {
        self.health.age_ms(self.clock.now_ms())
    }

    /// The most recent good record. Failed reads never touch it.
    pub fn last_measurement(&self) -> Option<MeasurementRecord> {
        self.last_measurement
    }

    /// Whether the last power command left the fan running. True until the
    /// first power-off, since the sensor powers up measuring.
    pub fn is_fan_active(&self) -> bool {
        self.fan_active
    }

    pub fn set_reset_threshold(&mut self, threshold_ms: u64) {
        self.config.reset_threshold_ms = threshold_ms;
    }

    pub fn reset_threshold_ms(&self) -> u64 {
        self.config.reset_threshold_ms
    }

    /// Destroys the driver and gives back its parts.
    pub fn release(self) -> (IF, D, C) {
        (self.interface, self.delay, self.clock)
    }
}
