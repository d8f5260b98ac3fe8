//! embedded-hal driver for the Sensirion SPS30 particulate matter sensor.
//!
//! The sensor is reached either over UART, using Sensirion's SHDLC framing,
//! or over I2C. Both are hidden behind the [`Interface`] trait; pick one with
//! [`Sps30::new_uart`] or [`Sps30::new_i2c`].
//!
//! Besides decoding measurements, the driver keeps track of the link's
//! health. Each [`Sps30::attempt_read`] is counted as good or bad, and once
//! no good read has arrived for longer than the reset threshold, a failed
//! read power cycles and cleans the sensor before returning.
//!
//! ```ignore
//! let mut sps30 = Sps30::new_i2c(i2c, delay, clock);
//! sps30.initialize()?;
//! loop {
//!     if let Ok(m) = sps30.attempt_read() {
//!         // m.mass_pm2_5, m.number_pm10_0, ...
//!     }
//!     // the sensor produces a new measurement every second
//! }
//! ```
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

mod commands;
pub mod crc;
mod error;
pub mod health;
pub mod i2c;
mod interface;
pub mod recovery;
pub mod shdlc;
mod sps30;
mod types;
pub mod uart;

pub use commands::Command;
pub use error::{Error, ReadFailure};
pub use health::{LinkHealth, LinkState};
pub use i2c::I2cInterface;
pub use interface::{Clock, Interface, SerialPort};
pub use sps30::{Config, Sps30, DEFAULT_RESET_THRESHOLD_MS};
pub use types::{MeasurementRecord, MEASUREMENT_LEN};
pub use uart::UartInterface;
