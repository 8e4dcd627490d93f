use embedded_hal::i2c as hal_i2c;

use crate::protocol::{Command, Write};

/// Blanket trait for types implementing `i2c::I2c`
pub trait I2cBus: hal_i2c::I2c<hal_i2c::SevenBitAddress> {
    type BusError: From<<Self as hal_i2c::ErrorType>::Error> + core::fmt::Debug;
}

impl<T, E> I2cBus for T
where
    T: hal_i2c::I2c<hal_i2c::SevenBitAddress, Error = E>,
    E: core::fmt::Debug,
{
    type BusError = E;
}

/// Issue `CH423` commands on a bus.
///
/// Every command is exactly one transaction carrying (or returning) exactly one byte.
pub(crate) trait CommandExt {
    type Error;

    fn send(&mut self, write: Write) -> Result<(), Self::Error>;
    fn read_io(&mut self) -> Result<u8, Self::Error>;
}

impl<I2C: I2cBus> CommandExt for I2C {
    type Error = I2C::BusError;

    fn send(&mut self, write: Write) -> Result<(), Self::Error> {
        log::debug!("ch423: write {:?} <- {:#04x}", write.command, write.value);
        self.write(write.command.into(), &[write.value])
            .map_err(|e| {
                let e = I2C::BusError::from(e);
                log::warn!("ch423: {:?} failed: {:?}", write.command, e);
                e
            })
    }

    fn read_io(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0x00];
        self.read(Command::ReadIo.into(), &mut buf).map_err(|e| {
            let e = I2C::BusError::from(e);
            log::warn!("ch423: {:?} failed: {:?}", Command::ReadIo, e);
            e
        })?;
        log::debug!("ch423: read {:?} -> {:#04x}", Command::ReadIo, buf[0]);
        Ok(buf[0])
    }
}

#[cfg(feature = "async")]
pub use asynch::AsyncI2cBus;
#[cfg(feature = "async")]
pub(crate) use asynch::AsyncCommandExt;

#[cfg(feature = "async")]
mod asynch {
    use embedded_hal_async::i2c as hal_i2c;

    use crate::protocol::{Command, Write};

    /// Blanket trait for types implementing the async `i2c::I2c`
    pub trait AsyncI2cBus: hal_i2c::I2c<hal_i2c::SevenBitAddress> {
        type BusError: From<<Self as hal_i2c::ErrorType>::Error> + core::fmt::Debug;
    }

    impl<T, E> AsyncI2cBus for T
    where
        T: hal_i2c::I2c<hal_i2c::SevenBitAddress, Error = E>,
        E: core::fmt::Debug,
    {
        type BusError = E;
    }

    pub(crate) trait AsyncCommandExt {
        type Error;

        async fn send(&mut self, write: Write) -> Result<(), Self::Error>;
        async fn read_io(&mut self) -> Result<u8, Self::Error>;
    }

    impl<I2C: AsyncI2cBus> AsyncCommandExt for I2C {
        type Error = I2C::BusError;

        async fn send(&mut self, write: Write) -> Result<(), Self::Error> {
            log::debug!("ch423: write {:?} <- {:#04x}", write.command, write.value);
            self.write(write.command.into(), &[write.value])
                .await
                .map_err(|e| {
                    let e = I2C::BusError::from(e);
                    log::warn!("ch423: {:?} failed: {:?}", write.command, e);
                    e
                })
        }

        async fn read_io(&mut self) -> Result<u8, Self::Error> {
            let mut buf = [0x00];
            self.read(Command::ReadIo.into(), &mut buf)
                .await
                .map_err(|e| {
                    let e = I2C::BusError::from(e);
                    log::warn!("ch423: {:?} failed: {:?}", Command::ReadIo, e);
                    e
                })?;
            log::debug!("ch423: read {:?} -> {:#04x}", Command::ReadIo, buf[0]);
            Ok(buf[0])
        }
    }
}
