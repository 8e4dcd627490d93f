//! Async driver for the `CH423`, using embedded-hal-async's [`i2c::I2c`][embedded_hal_async::i2c::I2c].
//!
//! This module is only built if the `"async"` feature is enabled.  [`Ch423Async`] offers the same
//! line operations as [`Ch423`][crate::Ch423] and shares its register cache logic.  It is used
//! through `&mut self`, so the exclusive borrow serializes all operations; wrap it in an async
//! mutex to share it between tasks.

use crate::bus::{AsyncCommandExt, AsyncI2cBus};
use crate::cache::RegisterCache;
use crate::protocol::Config;
use crate::{Direction, DriveMode, Error};

/// `CH423` "I2C GPIO expander / LED driver" on an async bus
pub struct Ch423Async<I2C> {
    i2c: I2C,
    cache: RegisterCache,
}

impl<I2C: AsyncI2cBus> Ch423Async<I2C> {
    /// Create a new driver and bring the chip into its baseline state: IO lines are inputs, OC lines
    /// are push-pull and driven low.
    pub async fn new(i2c: I2C) -> Result<Self, Error<I2C::BusError>> {
        let mut driver = Self {
            i2c,
            cache: RegisterCache::power_on(),
        };

        driver.write_config(Config::empty()).await?;
        driver.write_outputs(0).await?;
        log::debug!("ch423: initialized");

        Ok(driver)
    }

    /// Give back the bus.  The chip keeps its current state.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub async fn write_config(&mut self, desired: Config) -> Result<(), Error<I2C::BusError>> {
        if let Some(write) = self.cache.stage_config(desired) {
            self.i2c.send(write).await?;
            self.cache.commit(write);
        }
        Ok(())
    }

    pub async fn write_outputs(&mut self, desired: u32) -> Result<(), Error<I2C::BusError>> {
        for write in self.cache.stage_outputs(desired) {
            self.i2c.send(write).await?;
            self.cache.commit(write);
        }
        Ok(())
    }

    pub fn config(&self) -> Config {
        self.cache.config()
    }

    pub fn outputs(&self) -> u32 {
        self.cache.outputs()
    }

    pub fn direction(&self) -> Direction {
        self.cache.direction()
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.cache.drive_mode()
    }

    pub fn get_direction(&self, line: u8) -> Result<Direction, Error<I2C::BusError>> {
        self.cache.get_direction(line)
    }

    pub async fn read(&mut self, line: u8) -> Result<bool, Error<I2C::BusError>> {
        let bit = RegisterCache::input_bit(line)?;
        Ok(self.read_inputs().await? & bit != 0)
    }

    pub async fn read_inputs(&mut self) -> Result<u8, Error<I2C::BusError>> {
        let inputs = self.i2c.read_io().await?;
        self.cache.woken();
        Ok(inputs)
    }

    pub fn is_set(&self, line: u8) -> Result<bool, Error<I2C::BusError>> {
        self.cache.is_set(line)
    }

    pub async fn set(&mut self, line: u8, value: bool) -> Result<(), Error<I2C::BusError>> {
        let desired = self.cache.line_outputs(line, value)?;
        self.write_outputs(desired).await
    }

    pub async fn set_multiple(&mut self, mask: u32, values: u32) -> Result<(), Error<I2C::BusError>> {
        let desired = self.cache.masked_outputs(mask, values);
        self.write_outputs(desired).await
    }

    pub async fn toggle(&mut self, line: u8) -> Result<(), Error<I2C::BusError>> {
        let desired = self.cache.toggled_outputs(line)?;
        self.write_outputs(desired).await
    }

    pub async fn set_direction_input(&mut self, line: u8) -> Result<(), Error<I2C::BusError>> {
        let config = self.cache.direction_input_config(line)?;
        self.write_config(config).await
    }

    pub async fn set_direction_output(
        &mut self,
        line: u8,
        value: bool,
    ) -> Result<(), Error<I2C::BusError>> {
        if let Some(config) = self.cache.direction_output_config(line)? {
            self.write_config(config).await?;
        }
        self.set(line, value).await
    }

    pub async fn set_drive_mode(
        &mut self,
        line: u8,
        mode: DriveMode,
    ) -> Result<(), Error<I2C::BusError>> {
        let config = self.cache.drive_mode_config(line, mode)?;
        self.write_config(config).await
    }

    pub async fn set_sleep(&mut self, sleep: bool) -> Result<(), Error<I2C::BusError>> {
        let config = self.cache.sleep_config(sleep);
        self.write_config(config).await
    }
}
