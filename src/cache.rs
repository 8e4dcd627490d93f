//! Write-through cache of the `CH423` registers.
//!
//! None of the writable registers can be read back, so the values cached here are the only record
//! of the chip's state.  The cache decides which transactions are necessary to reach a desired
//! state and is updated one transaction at a time, only after that transaction went through.  It
//! never talks to the bus itself, so the blocking and the async driver share it, together with the
//! line operations planned on top of it.

use crate::protocol::{Command, Config, Write, OUTPUT_COMMANDS};
use crate::{Direction, DriveMode, Error, PinGroup};

/// Mask of all 24 logical lines in the output shadow.
pub const LINE_MASK: u32 = 0x00ff_ffff;

/// Staged transactions for one output update, in the order they must be sent.
pub type Writes = heapless::Vec<Write, 3>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCache {
    config: Config,
    outputs: u32,
    /// Whether byte 0 of `outputs` was actually transmitted with `SetIo`.  While IO0..IO7 are
    /// inputs their output values are only latched here.
    io_synced: bool,
}

impl RegisterCache {
    /// Cache contents that do not match any state the chip could be in after power-on.
    ///
    /// The chip powers up with config `0x00` and OC lines high.  Caching config as `0xff` forces the
    /// initialization sequence to write the config register once, and caching the OC bytes as
    /// `0xff` makes driving them low actually reach the chip.
    pub fn power_on() -> Self {
        Self {
            config: Config::all(),
            outputs: 0x00ff_ff00,
            io_synced: false,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn outputs(&self) -> u32 {
        self.outputs
    }

    /// The config write needed to reach `desired`, if any.
    pub fn stage_config(&self, desired: Config) -> Option<Write> {
        if desired == self.config {
            log::trace!("ch423: config {:#04x} unchanged", desired.bits());
            None
        } else {
            Some(Write::config(desired))
        }
    }

    /// The output writes needed to reach `desired`, one per changed byte.
    ///
    /// IO0..IO7 are only written when the group is an output (`IO_OE` committed).  Otherwise their
    /// byte is latched into the shadow right away and sent once the group becomes an output.
    pub fn stage_outputs(&mut self, desired: u32) -> Writes {
        let desired = desired & LINE_MASK;
        let io_enabled = self.config.contains(Config::IO_OE);
        let mut writes = Writes::new();

        for (index, command) in OUTPUT_COMMANDS.into_iter().enumerate() {
            let shift = index as u32 * 8;
            let value = (desired >> shift) as u8;
            let cached = (self.outputs >> shift) as u8;

            if command == Command::SetIo && !io_enabled {
                self.store_byte(shift, value);
                self.io_synced = false;
                continue;
            }

            let stale = command == Command::SetIo && !self.io_synced;
            if value != cached || stale {
                // One slot per output command.
                let pushed = writes.push(Write { command, value }).is_ok();
                debug_assert!(pushed, "more output writes than output commands");
            } else {
                log::trace!("ch423: {:?} {:#04x} unchanged", command, value);
            }
        }

        writes
    }

    /// Record that `write` was accepted by the chip.
    pub fn commit(&mut self, write: Write) {
        match write.command {
            Command::Config => {
                let config = Config::from_bits_retain(write.value);
                if !config.contains(Config::IO_OE) {
                    self.io_synced = false;
                }
                self.config = config;
            }
            Command::SetIo => {
                self.store_byte(0, write.value);
                self.io_synced = true;
                self.woken();
            }
            Command::SetOcLow | Command::SetOcHigh => {
                if let Some(shift) = write.command.output_shift() {
                    self.store_byte(shift, write.value);
                }
                self.woken();
            }
            Command::ReadIo => self.woken(),
        }
    }

    /// Record bus traffic other than a config write.  Any transaction wakes the chip up.
    pub fn woken(&mut self) {
        if self.config.contains(Config::SLEEP) {
            log::debug!("ch423: woken up");
            self.config.remove(Config::SLEEP);
        }
    }

    fn store_byte(&mut self, shift: u32, value: u8) {
        self.outputs = (self.outputs & !(0xff << shift)) | ((value as u32) << shift);
    }

    /// Config to write for anything but sleep.  The write itself wakes the chip, so `SLEEP` is
    /// never carried over.
    fn awake_config(&self) -> Config {
        self.config - Config::SLEEP
    }

    pub fn direction(&self) -> Direction {
        Direction::of(self.config)
    }

    pub fn drive_mode(&self) -> DriveMode {
        DriveMode::of(self.config)
    }

    pub fn get_direction<E>(&self, line: u8) -> Result<Direction, Error<E>> {
        match PinGroup::checked(line)? {
            PinGroup::Bidirectional => Ok(self.direction()),
            PinGroup::OutputLowByte | PinGroup::OutputHighByte => Ok(Direction::Output),
        }
    }

    /// Bit of `line` in the byte returned by [`Command::ReadIo`].  OC lines cannot be read back.
    pub fn input_bit<E>(line: u8) -> Result<u8, Error<E>> {
        match PinGroup::checked(line)? {
            PinGroup::Bidirectional => Ok(1 << line),
            PinGroup::OutputLowByte | PinGroup::OutputHighByte => Err(Error::Unsupported),
        }
    }

    /// The output value last set for `line`.
    pub fn is_set<E>(&self, line: u8) -> Result<bool, Error<E>> {
        PinGroup::checked(line)?;
        Ok(self.outputs & (1 << line) != 0)
    }

    /// Output shadow with the lines in `mask` replaced by the bits of `values`.  Lines above 23 are
    /// ignored.
    pub fn masked_outputs(&self, mask: u32, values: u32) -> u32 {
        let mask = mask & LINE_MASK;
        (self.outputs & !mask) | (values & mask)
    }

    /// Output shadow with `line` set to `value`.
    pub fn line_outputs<E>(&self, line: u8, value: bool) -> Result<u32, Error<E>> {
        PinGroup::checked(line)?;
        let mask = 1 << line;
        Ok(self.masked_outputs(mask, if value { mask } else { 0 }))
    }

    /// Output shadow with `line` inverted.
    pub fn toggled_outputs<E>(&self, line: u8) -> Result<u32, Error<E>> {
        self.line_outputs(line, !self.is_set(line)?)
    }

    pub fn direction_input_config<E>(&self, line: u8) -> Result<Config, Error<E>> {
        match PinGroup::checked(line)? {
            PinGroup::Bidirectional => Ok(self.awake_config() - Config::IO_OE),
            PinGroup::OutputLowByte | PinGroup::OutputHighByte => Err(Error::InvalidArgument),
        }
    }

    /// Config needed before `line` can drive a value, `None` if it already can.
    pub fn direction_output_config<E>(&self, line: u8) -> Result<Option<Config>, Error<E>> {
        let group = PinGroup::checked(line)?;
        if group == PinGroup::Bidirectional && self.direction() != Direction::Output {
            Ok(Some(self.awake_config() | Config::IO_OE))
        } else {
            Ok(None)
        }
    }

    pub fn drive_mode_config<E>(&self, line: u8, mode: DriveMode) -> Result<Config, Error<E>> {
        match PinGroup::checked(line)? {
            PinGroup::Bidirectional => Err(Error::Unsupported),
            PinGroup::OutputLowByte | PinGroup::OutputHighByte => Ok(match mode {
                DriveMode::OpenDrain => self.awake_config() | Config::OD_EN,
                DriveMode::PushPull => self.awake_config() - Config::OD_EN,
            }),
        }
    }

    pub fn sleep_config(&self, sleep: bool) -> Config {
        let mut config = self.awake_config();
        config.set(Config::SLEEP, sleep);
        config
    }
}
