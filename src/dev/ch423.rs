//! Support for the `CH423` "I2C GPIO expander / LED driver"
//!
//! The chip exposes 24 lines:
//!
//! - IO0..IO7 (lines 0..=7) are bidirectional, but only as a group: all eight are either inputs or
//!   outputs.
//! - OC0..OC15 (lines 8..=23) are output only.  They are push-pull or open-drain, again all of
//!   them together.
//!
//! The LED driver mode of the chip is not supported.
//!
//! The `CH423` does not have an I2C address.  Each command is sent to its own address instead, so
//! the chip cannot share a bus with other devices.  None of its registers can be read back except
//! the IO input state, which is why [`Driver`] caches everything it writes and only talks to the
//! chip when a register actually has to change.

use crate::cache::RegisterCache;
use crate::protocol::Config;
use crate::{CommandExt, Direction, DriveMode, Error};

/// `CH423` "I2C GPIO expander / LED driver"
pub struct Ch423<M>(M);

impl<I2C> Ch423<core::cell::RefCell<Driver<I2C>>>
where
    I2C: crate::I2cBus,
{
    /// Create a new driver and bring the chip into its baseline state: IO lines are inputs, OC lines
    /// are push-pull and driven low.
    pub fn new(i2c: I2C) -> Result<Self, Error<I2C::BusError>> {
        Self::with_mutex(i2c)
    }
}

impl<I2C, M> Ch423<M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    pub fn with_mutex(i2c: I2C) -> Result<Self, Error<I2C::BusError>> {
        Ok(Self(crate::PortMutex::create(Driver::new(i2c)?)))
    }

    pub fn split(&mut self) -> Parts<'_, M> {
        Parts {
            io0: crate::IoPin::new(0, &self.0),
            io1: crate::IoPin::new(1, &self.0),
            io2: crate::IoPin::new(2, &self.0),
            io3: crate::IoPin::new(3, &self.0),
            io4: crate::IoPin::new(4, &self.0),
            io5: crate::IoPin::new(5, &self.0),
            io6: crate::IoPin::new(6, &self.0),
            io7: crate::IoPin::new(7, &self.0),
            oc0: crate::OcPin::new(8, &self.0),
            oc1: crate::OcPin::new(9, &self.0),
            oc2: crate::OcPin::new(10, &self.0),
            oc3: crate::OcPin::new(11, &self.0),
            oc4: crate::OcPin::new(12, &self.0),
            oc5: crate::OcPin::new(13, &self.0),
            oc6: crate::OcPin::new(14, &self.0),
            oc7: crate::OcPin::new(15, &self.0),
            oc8: crate::OcPin::new(16, &self.0),
            oc9: crate::OcPin::new(17, &self.0),
            oc10: crate::OcPin::new(18, &self.0),
            oc11: crate::OcPin::new(19, &self.0),
            oc12: crate::OcPin::new(20, &self.0),
            oc13: crate::OcPin::new(21, &self.0),
            oc14: crate::OcPin::new(22, &self.0),
            oc15: crate::OcPin::new(23, &self.0),
        }
    }

    pub fn get_direction(&self, line: u8) -> Result<Direction, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.get_direction(line))
    }

    pub fn read(&self, line: u8) -> Result<bool, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.read(line))
    }

    pub fn read_inputs(&self) -> Result<u8, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.read_inputs())
    }

    pub fn is_set(&self, line: u8) -> Result<bool, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.is_set(line))
    }

    pub fn set(&self, line: u8, value: bool) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.set(line, value))
    }

    pub fn set_multiple(&self, mask: u32, values: u32) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.set_multiple(mask, values))
    }

    pub fn toggle(&self, line: u8) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.toggle(line))
    }

    pub fn set_direction_input(&self, line: u8) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.set_direction_input(line))
    }

    pub fn set_direction_output(&self, line: u8, value: bool) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.set_direction_output(line, value))
    }

    pub fn set_drive_mode(&self, line: u8, mode: DriveMode) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.set_drive_mode(line, mode))
    }

    pub fn set_sleep(&self, sleep: bool) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.set_sleep(sleep))
    }

    pub fn direction(&self) -> Direction {
        self.0.lock(|drv| drv.direction())
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.0.lock(|drv| drv.drive_mode())
    }

    /// Give back the bus.  The chip keeps its current state.
    pub fn release(self) -> I2C {
        self.0.into_inner().release()
    }
}

pub struct Parts<'a, M> {
    pub io0: crate::IoPin<'a, M>,
    pub io1: crate::IoPin<'a, M>,
    pub io2: crate::IoPin<'a, M>,
    pub io3: crate::IoPin<'a, M>,
    pub io4: crate::IoPin<'a, M>,
    pub io5: crate::IoPin<'a, M>,
    pub io6: crate::IoPin<'a, M>,
    pub io7: crate::IoPin<'a, M>,
    pub oc0: crate::OcPin<'a, M>,
    pub oc1: crate::OcPin<'a, M>,
    pub oc2: crate::OcPin<'a, M>,
    pub oc3: crate::OcPin<'a, M>,
    pub oc4: crate::OcPin<'a, M>,
    pub oc5: crate::OcPin<'a, M>,
    pub oc6: crate::OcPin<'a, M>,
    pub oc7: crate::OcPin<'a, M>,
    pub oc8: crate::OcPin<'a, M>,
    pub oc9: crate::OcPin<'a, M>,
    pub oc10: crate::OcPin<'a, M>,
    pub oc11: crate::OcPin<'a, M>,
    pub oc12: crate::OcPin<'a, M>,
    pub oc13: crate::OcPin<'a, M>,
    pub oc14: crate::OcPin<'a, M>,
    pub oc15: crate::OcPin<'a, M>,
}

pub struct Driver<I2C> {
    i2c: I2C,
    cache: RegisterCache,
}

impl<I2C: crate::I2cBus> Driver<I2C> {
    pub fn new(i2c: I2C) -> Result<Self, Error<I2C::BusError>> {
        let mut driver = Self {
            i2c,
            cache: RegisterCache::power_on(),
        };

        // The chip powers up with config 0x00 and all OC lines high.  Put it into the same state,
        // except with the OC lines low.
        driver.write_config(Config::empty())?;
        driver.write_outputs(0)?;
        log::debug!("ch423: initialized");

        Ok(driver)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Write the configuration register, unless it already holds `desired`.
    pub fn write_config(&mut self, desired: Config) -> Result<(), Error<I2C::BusError>> {
        if let Some(write) = self.cache.stage_config(desired) {
            self.i2c.send(write)?;
            self.cache.commit(write);
        }
        Ok(())
    }

    /// Write the 24-bit output state, only sending the bytes that changed.
    ///
    /// Each byte is committed to the cache as soon as its own transaction succeeded, so after an
    /// error the cache still reflects exactly what the chip received.
    pub fn write_outputs(&mut self, desired: u32) -> Result<(), Error<I2C::BusError>> {
        for write in self.cache.stage_outputs(desired) {
            self.i2c.send(write)?;
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

    /// Read the electrical level of an IO line.
    ///
    /// In output mode this is the level the chip drives.  OC lines cannot be read back.
    pub fn read(&mut self, line: u8) -> Result<bool, Error<I2C::BusError>> {
        let bit = RegisterCache::input_bit(line)?;
        Ok(self.read_inputs()? & bit != 0)
    }

    pub fn read_inputs(&mut self) -> Result<u8, Error<I2C::BusError>> {
        let inputs = self.i2c.read_io()?;
        self.cache.woken();
        Ok(inputs)
    }

    /// The output value last set for `line`, from the cache.
    pub fn is_set(&self, line: u8) -> Result<bool, Error<I2C::BusError>> {
        self.cache.is_set(line)
    }

    pub fn set(&mut self, line: u8, value: bool) -> Result<(), Error<I2C::BusError>> {
        let desired = self.cache.line_outputs(line, value)?;
        self.write_outputs(desired)
    }

    /// Set all lines in `mask` to the corresponding bit of `values` with a single cache update.
    pub fn set_multiple(&mut self, mask: u32, values: u32) -> Result<(), Error<I2C::BusError>> {
        self.write_outputs(self.cache.masked_outputs(mask, values))
    }

    pub fn toggle(&mut self, line: u8) -> Result<(), Error<I2C::BusError>> {
        let desired = self.cache.toggled_outputs(line)?;
        self.write_outputs(desired)
    }

    pub fn set_direction_input(&mut self, line: u8) -> Result<(), Error<I2C::BusError>> {
        let config = self.cache.direction_input_config(line)?;
        self.write_config(config)
    }

    /// Make `line` an output driving `value`.
    ///
    /// For IO lines this switches the whole group.  OC lines are outputs anyway.
    pub fn set_direction_output(
        &mut self,
        line: u8,
        value: bool,
    ) -> Result<(), Error<I2C::BusError>> {
        if let Some(config) = self.cache.direction_output_config(line)? {
            self.write_config(config)?;
        }
        self.set(line, value)
    }

    /// Set the drive mode of all OC lines.  `line` only selects which group is meant.
    pub fn set_drive_mode(&mut self, line: u8, mode: DriveMode) -> Result<(), Error<I2C::BusError>> {
        let config = self.cache.drive_mode_config(line, mode)?;
        self.write_config(config)
    }

    /// Put the chip into low-power sleep, or wake it up.
    ///
    /// Any later transaction wakes the chip as well; the cache follows that.
    pub fn set_sleep(&mut self, sleep: bool) -> Result<(), Error<I2C::BusError>> {
        self.write_config(self.cache.sleep_config(sleep))
    }
}
