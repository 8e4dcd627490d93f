//! Driver for the WCH `CH423` I2C GPIO-expander.
//!
//! The `CH423` has eight bidirectional lines (IO0..IO7) which switch direction only as a group, and
//! sixteen output-only lines (OC0..OC15) which share one drive mode.  The chip has no readback for
//! anything but the IO input levels, so this driver keeps a cache of every register it writes and
//! only issues the bus transactions which actually change something.
//!
//! Lines are numbered 0..=23: IO0..IO7 are lines 0..=7, OC0..OC15 are lines 8..=23.
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! let mut ch423 = ch423_expander::Ch423::new(i2c).unwrap();
//! let mut pins = ch423.split();
//!
//! pins.io0.set_as_output(true).unwrap();
//! pins.oc3.set_high().unwrap();
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "async")]
pub mod asynch;
mod bus;
mod cache;
mod common;
pub mod dev;
mod error;
mod multi;
mod mutex;
mod pin;
pub mod protocol;

pub use bus::I2cBus;
#[cfg(feature = "async")]
pub use bus::AsyncI2cBus;
pub use cache::LINE_MASK;
pub use common::{Direction, DriveMode, PinGroup, LINE_COUNT};
pub use error::Error;
pub use multi::{read_multiple, write_multiple};
pub use mutex::PortMutex;
pub use pin::{IoPin, OcPin, OutputLine};

pub(crate) use bus::CommandExt;

pub use dev::ch423::{Ch423, Driver, Parts};
#[cfg(feature = "async")]
pub use asynch::Ch423Async;
