use embedded_hal::digital::{self as hal_digital, ErrorType};

use crate::{Direction, DriveMode, Driver, Error};

/// Representation of one of the bidirectional lines IO0..IO7.
///
/// `IoPin` is not constructed directly, this type is created by instantiating a [`Ch423`][crate::Ch423]
/// and then getting access to all its pins using the `.split()` method.
///
/// The direction of IO lines is shared by all eight of them.  Changing it on one pin changes it for
/// the whole group.
pub struct IoPin<'a, M> {
    line: u8,
    port_driver: &'a M,
}

/// Representation of one of the output-only lines OC0..OC15.
pub struct OcPin<'a, M> {
    line: u8,
    port_driver: &'a M,
}

impl<'a, M> IoPin<'a, M> {
    pub(crate) fn new(line: u8, port_driver: &'a M) -> Self {
        assert!(line < 8);
        Self { line, port_driver }
    }
}

impl<'a, M> OcPin<'a, M> {
    pub(crate) fn new(line: u8, port_driver: &'a M) -> Self {
        assert!((8..crate::LINE_COUNT).contains(&line));
        Self { line, port_driver }
    }
}

/// A pin that can take part in [`write_multiple()`][crate::write_multiple].
pub trait OutputLine<'a, M> {
    /// The logical line number (0..=23).
    fn line(&self) -> u8;

    fn port_driver(&self) -> &'a M;
}

impl<'a, M> OutputLine<'a, M> for IoPin<'a, M> {
    fn line(&self) -> u8 {
        self.line
    }

    fn port_driver(&self) -> &'a M {
        self.port_driver
    }
}

impl<'a, M> OutputLine<'a, M> for OcPin<'a, M> {
    fn line(&self) -> u8 {
        self.line
    }

    fn port_driver(&self) -> &'a M {
        self.port_driver
    }
}

impl<'a, I2C, M> IoPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    /// Make the whole IO group inputs.
    pub fn set_as_input(&mut self) -> Result<(), Error<I2C::BusError>> {
        self.port_driver
            .lock(|drv| drv.set_direction_input(self.line))
    }

    /// Make the whole IO group outputs, with this pin driving `state`.
    ///
    /// The other IO pins drive the value last set for them.
    pub fn set_as_output(&mut self, state: bool) -> Result<(), Error<I2C::BusError>> {
        self.port_driver
            .lock(|drv| drv.set_direction_output(self.line, state))
    }

    pub fn direction(&self) -> Direction {
        self.port_driver.lock(|drv| drv.direction())
    }

    /// Read the electrical level.  For an output this is the level the chip drives.
    pub fn is_high(&self) -> Result<bool, Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.read(self.line))
    }

    pub fn is_low(&self) -> Result<bool, Error<I2C::BusError>> {
        self.is_high().map(|b| !b)
    }

    /// Set the pin HIGH.  While the group is an input, the value is only remembered.
    pub fn set_high(&mut self) -> Result<(), Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.set(self.line, true))
    }

    pub fn set_low(&mut self) -> Result<(), Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.set(self.line, false))
    }

    pub fn is_set_high(&self) -> Result<bool, Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.is_set(self.line))
    }

    pub fn is_set_low(&self) -> Result<bool, Error<I2C::BusError>> {
        self.is_set_high().map(|b| !b)
    }

    pub fn toggle(&mut self) -> Result<(), Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.toggle(self.line))
    }
}

impl<'a, I2C, M> OcPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    /// Set the drive mode of all OC pins.
    pub fn set_drive_mode(&mut self, mode: DriveMode) -> Result<(), Error<I2C::BusError>> {
        self.port_driver
            .lock(|drv| drv.set_drive_mode(self.line, mode))
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.port_driver.lock(|drv| drv.drive_mode())
    }

    pub fn set_high(&mut self) -> Result<(), Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.set(self.line, true))
    }

    pub fn set_low(&mut self) -> Result<(), Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.set(self.line, false))
    }

    pub fn is_set_high(&self) -> Result<bool, Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.is_set(self.line))
    }

    pub fn is_set_low(&self) -> Result<bool, Error<I2C::BusError>> {
        self.is_set_high().map(|b| !b)
    }

    pub fn toggle(&mut self) -> Result<(), Error<I2C::BusError>> {
        self.port_driver.lock(|drv| drv.toggle(self.line))
    }
}

impl<'a, I2C, M> ErrorType for IoPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    type Error = Error<I2C::BusError>;
}

impl<'a, I2C, M> hal_digital::InputPin for IoPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        IoPin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        IoPin::is_low(self)
    }
}

impl<'a, I2C, M> hal_digital::OutputPin for IoPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        IoPin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        IoPin::set_high(self)
    }
}

impl<'a, I2C, M> hal_digital::StatefulOutputPin for IoPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        IoPin::is_set_high(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        IoPin::is_set_low(self)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        IoPin::toggle(self)
    }
}

impl<'a, I2C, M> ErrorType for OcPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    type Error = Error<I2C::BusError>;
}

impl<'a, I2C, M> hal_digital::OutputPin for OcPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        OcPin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        OcPin::set_high(self)
    }
}

impl<'a, I2C, M> hal_digital::StatefulOutputPin for OcPin<'a, M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        OcPin::is_set_high(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        OcPin::is_set_low(self)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        OcPin::toggle(self)
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    use crate::{Direction, DriveMode, OutputLine};

    fn init() -> Vec<mock_i2c::Transaction> {
        vec![
            mock_i2c::Transaction::write(0x24, vec![0x00]),
            mock_i2c::Transaction::write(0x22, vec![0x00]),
            mock_i2c::Transaction::write(0x23, vec![0x00]),
        ]
    }

    #[test]
    fn pin_lines() {
        let mut bus = mock_i2c::Mock::new(&init());

        let mut ch423 = crate::Ch423::new(bus.clone()).unwrap();
        let pins = ch423.split();
        assert_eq!(OutputLine::line(&pins.io0), 0);
        assert_eq!(OutputLine::line(&pins.io7), 7);
        assert_eq!(OutputLine::line(&pins.oc0), 8);
        assert_eq!(OutputLine::line(&pins.oc15), 23);

        bus.done();
    }

    #[test]
    fn io_pins() {
        let mut expectations = init();
        expectations.extend([
            // io2 becomes an output, taking the whole group along
            mock_i2c::Transaction::write(0x24, vec![0x01]),
            mock_i2c::Transaction::write(0x30, vec![0b0000_0100]),
            // io5 writes
            mock_i2c::Transaction::write(0x30, vec![0b0010_0100]),
            mock_i2c::Transaction::write(0x30, vec![0b0000_0100]),
            // back to input
            mock_i2c::Transaction::write(0x24, vec![0x00]),
            // io6 reads
            mock_i2c::Transaction::read(0x26, vec![0b0100_0000]),
            mock_i2c::Transaction::read(0x26, vec![0b1011_1111]),
        ]);
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut ch423 = crate::Ch423::new(bus.clone()).unwrap();
        let mut pins = ch423.split();

        pins.io2.set_as_output(true).unwrap();
        assert_eq!(pins.io7.direction(), Direction::Output);

        pins.io5.set_high().unwrap();
        assert!(pins.io5.is_set_high().unwrap());
        pins.io5.toggle().unwrap();
        assert!(pins.io5.is_set_low().unwrap());

        pins.io0.set_as_input().unwrap();
        assert_eq!(pins.io2.direction(), Direction::Input);

        assert!(pins.io6.is_high().unwrap());
        assert!(pins.io6.is_low().unwrap());

        bus.done();
    }

    #[test]
    fn oc_pins() {
        let mut expectations = init();
        expectations.extend([
            mock_i2c::Transaction::write(0x22, vec![0b0000_0001]),
            mock_i2c::Transaction::write(0x23, vec![0b1000_0000]),
            mock_i2c::Transaction::write(0x22, vec![0b0000_0000]),
            mock_i2c::Transaction::write(0x24, vec![0x10]),
        ]);
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut ch423 = crate::Ch423::new(bus.clone()).unwrap();
        let mut pins = ch423.split();

        pins.oc0.set_high().unwrap();
        pins.oc15.set_high().unwrap();
        // already high, nothing to send
        pins.oc15.set_high().unwrap();
        pins.oc0.toggle().unwrap();
        assert!(pins.oc0.is_set_low().unwrap());
        assert!(pins.oc15.is_set_high().unwrap());

        pins.oc3.set_drive_mode(DriveMode::OpenDrain).unwrap();
        assert_eq!(pins.oc12.drive_mode(), DriveMode::OpenDrain);

        bus.done();
    }

    #[test]
    fn embedded_hal_traits() {
        let mut expectations = init();
        expectations.extend([
            mock_i2c::Transaction::write(0x24, vec![0x01]),
            mock_i2c::Transaction::write(0x30, vec![0b0000_0000]),
            mock_i2c::Transaction::write(0x30, vec![0b0000_0010]),
            mock_i2c::Transaction::read(0x26, vec![0b0000_0010]),
            mock_i2c::Transaction::write(0x23, vec![0b0000_0100]),
        ]);
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut ch423 = crate::Ch423::new(bus.clone()).unwrap();
        let mut pins = ch423.split();

        pins.io1.set_as_output(false).unwrap();
        OutputPin::set_high(&mut pins.io1).unwrap();
        assert!(StatefulOutputPin::is_set_high(&mut pins.io1).unwrap());
        assert!(InputPin::is_high(&mut pins.io1).unwrap());

        StatefulOutputPin::toggle(&mut pins.oc10).unwrap();
        assert!(StatefulOutputPin::is_set_high(&mut pins.oc10).unwrap());

        bus.done();
    }
}
