use crate::{Driver, Error, IoPin, OutputLine};

/// Set multiple pins at the same time.
///
/// The usual method of setting multiple pins
///
/// ```no_run
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let mut ch423 = ch423_expander::Ch423::new(i2c).unwrap();
/// # let p = ch423.split();
/// # let mut oc0 = p.oc0;
/// # let mut oc9 = p.oc9;
/// oc0.set_high().unwrap();
/// oc9.set_low().unwrap();
/// ```
///
/// can be problematic because the two changes are done as separate updates and every update is at
/// least one bus transaction.  `write_multiple()` merges the pins into one update of the output
/// cache, so each of the three output bytes of the `CH423` is written at most once.  Pins from the
/// IO and the OC group can be mixed.  An empty list does nothing.
///
/// # Panics
///
/// If the pins do not all belong to the same chip.
///
/// ## Example
/// ```no_run
/// # use core::cell::RefCell;
/// # use ch423_expander::{Driver, OutputLine};
/// # type Port = RefCell<Driver<embedded_hal_mock::eh1::i2c::Mock>>;
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let mut ch423 = ch423_expander::Ch423::new(i2c).unwrap();
/// # let p = ch423.split();
/// # let mut oc0 = p.oc0;
/// # let mut oc9 = p.oc9;
/// let pins: [&mut dyn OutputLine<'_, Port>; 2] = [&mut oc0, &mut oc9];
/// ch423_expander::write_multiple(pins, [true, false]).unwrap();
/// ```
pub fn write_multiple<'a, I2C, M, const N: usize>(
    pins: [&mut dyn OutputLine<'a, M>; N],
    states: [bool; N],
) -> Result<(), Error<I2C::BusError>>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>> + 'a,
{
    let mut mask = 0x00;
    let mut values = 0x00;

    let Some(first) = pins.first() else {
        return Ok(());
    };
    let port_driver = first.port_driver();
    for (pin, state) in pins.iter().zip(states.iter()) {
        assert!(core::ptr::eq(pin.port_driver(), port_driver));
        let bit = 1 << pin.line();
        mask |= bit;
        if *state {
            values |= bit;
        }
    }

    port_driver.lock(|drv| drv.set_multiple(mask, values))
}

/// Read multiple IO pins at the same time.
///
/// All IO lines are read in a single bus transaction, so the returned levels were sampled at the
/// same instant.  An empty list is answered without a transaction.
///
/// # Panics
///
/// If the pins do not all belong to the same chip.
pub fn read_multiple<I2C, M, const N: usize>(
    pins: [&IoPin<'_, M>; N],
) -> Result<[bool; N], Error<I2C::BusError>>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    let mut ret = [false; N];
    let Some(first) = pins.first() else {
        return Ok(ret);
    };
    let port_driver = OutputLine::port_driver(*first);
    let inputs = port_driver.lock(|drv| drv.read_inputs())?;

    for (pin, state) in pins.iter().zip(ret.iter_mut()) {
        assert!(core::ptr::eq(OutputLine::port_driver(*pin), port_driver));
        *state = inputs & (1 << pin.line()) != 0;
    }

    Ok(ret)
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use embedded_hal_mock::eh1::i2c as mock_i2c;

    use crate::{Driver, OutputLine};

    type Port = RefCell<Driver<mock_i2c::Mock>>;

    fn init() -> Vec<mock_i2c::Transaction> {
        vec![
            mock_i2c::Transaction::write(0x24, vec![0x00]),
            mock_i2c::Transaction::write(0x22, vec![0x00]),
            mock_i2c::Transaction::write(0x23, vec![0x00]),
        ]
    }

    #[test]
    fn ch423_write_multiple() {
        let mut expectations = init();
        expectations.extend([
            mock_i2c::Transaction::write(0x24, vec![0x01]),
            mock_i2c::Transaction::write(0x30, vec![0x00]),
            // one write per changed byte, for any number of pins
            mock_i2c::Transaction::write(0x30, vec![0b0000_0010]),
            mock_i2c::Transaction::write(0x22, vec![0b0000_0101]),
            mock_i2c::Transaction::write(0x23, vec![0b1000_0000]),
            // unchanged bytes are skipped
            mock_i2c::Transaction::write(0x22, vec![0b0000_0001]),
        ]);
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut ch423 = crate::Ch423::new(bus.clone()).unwrap();
        let mut p = ch423.split();
        p.io0.set_as_output(false).unwrap();

        let pins: [&mut dyn OutputLine<'_, Port>; 4] =
            [&mut p.io1, &mut p.oc0, &mut p.oc2, &mut p.oc15];
        super::write_multiple(pins, [true, true, true, true]).unwrap();

        let pins: [&mut dyn OutputLine<'_, Port>; 3] = [&mut p.io1, &mut p.oc2, &mut p.oc15];
        super::write_multiple(pins, [true, false, true]).unwrap();

        bus.done();
    }

    #[test]
    fn ch423_read_multiple() {
        let mut expectations = init();
        expectations.extend([
            // single reads for multiple pins
            mock_i2c::Transaction::read(0x26, vec![0b0000_0101]),
            mock_i2c::Transaction::read(0x26, vec![0b0000_1010]),
        ]);
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut ch423 = crate::Ch423::new(bus.clone()).unwrap();
        let p = ch423.split();

        let res = super::read_multiple([&p.io0, &p.io1, &p.io2]).unwrap();
        assert_eq!(res, [true, false, true]);

        let res = super::read_multiple([&p.io1, &p.io0, &p.io3]).unwrap();
        assert_eq!(res, [true, false, true]);

        bus.done();
    }

    #[test]
    fn ch423_multiple_empty() {
        let mut bus = mock_i2c::Mock::new(&init());

        let _ch423 = crate::Ch423::new(bus.clone()).unwrap();

        // no pins, no transactions
        let pins: [&mut dyn OutputLine<'_, Port>; 0] = [];
        super::write_multiple(pins, []).unwrap();
        let res = super::read_multiple::<_, Port, 0>([]).unwrap();
        assert!(res.is_empty());

        bus.done();
    }

    #[test]
    #[should_panic]
    fn ch423_multiple_assert_same_chip() {
        let mut expectations = init();
        expectations.extend(init());
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut ch423_a = crate::Ch423::new(bus.clone()).unwrap();
        let mut ch423_b = crate::Ch423::new(bus.clone()).unwrap();
        let mut pa = ch423_a.split();
        let mut pb = ch423_b.split();

        let pins: [&mut dyn OutputLine<'_, Port>; 2] = [&mut pa.oc0, &mut pb.oc1];
        let _ = super::write_multiple(pins, [true, true]);

        bus.done();
    }
}
