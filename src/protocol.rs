//! Command codes and register layout of the `CH423`.
//!
//! The chip has no I2C address of its own.  Instead, each operation is selected by a command code
//! which is put on the bus in place of the device address.  This means the `CH423` must be the only
//! device on its bus.

bitflags::bitflags! {
    /// Contents of the configuration register (command [`Command::Config`]).
    ///
    /// The register cannot be read back; the driver only remembers what it wrote.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Config: u8 {
        /// IO0..IO7 are outputs when set, inputs when clear.
        const IO_OE = 1 << 0;
        /// LED decoding of the low OC byte (LED driver mode, unsupported).
        const DEC_L = 1 << 1;
        /// LED decoding of the high OC byte (LED driver mode, unsupported).
        const DEC_H = 1 << 2;
        /// Input change interrupt output.
        const X_INT = 1 << 3;
        /// OC0..OC15 are open-drain when set, push-pull when clear.
        const OD_EN = 1 << 4;
        /// LED intensity (LED driver mode, unsupported).
        const INTENS = 0b11 << 5;
        /// Low-power sleep.
        const SLEEP = 1 << 7;
    }
}

/// Bus command codes used by this driver.
///
/// The chip knows more commands (`0x31..=0x3f` for the LED driver mode) which are not used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Write OC0..OC7 (logical lines 8..=15).
    SetOcLow = 0x22,
    /// Write OC8..OC15 (logical lines 16..=23).
    SetOcHigh = 0x23,
    /// Write the configuration register.
    Config = 0x24,
    /// Read the electrical state of IO0..IO7.
    ReadIo = 0x26,
    /// Write IO0..IO7 (only has an effect while `IO_OE` is set).
    SetIo = 0x30,
}

impl From<Command> for u8 {
    fn from(c: Command) -> u8 {
        c as u8
    }
}

/// Output commands, in the order of the shadow bytes they write.
pub(crate) const OUTPUT_COMMANDS: [Command; 3] =
    [Command::SetIo, Command::SetOcLow, Command::SetOcHigh];

impl Command {
    /// Position of this command's payload inside the 24-bit output shadow.
    pub(crate) fn output_shift(self) -> Option<u32> {
        match self {
            Command::SetIo => Some(0),
            Command::SetOcLow => Some(8),
            Command::SetOcHigh => Some(16),
            Command::Config | Command::ReadIo => None,
        }
    }
}

/// A single-byte register write: the command code and its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Write {
    pub command: Command,
    pub value: u8,
}

impl Write {
    pub(crate) fn config(config: Config) -> Self {
        Self {
            command: Command::Config,
            value: config.bits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_commands_cover_the_shadow_bytes() {
        for (index, command) in OUTPUT_COMMANDS.iter().enumerate() {
            assert_eq!(command.output_shift(), Some(index as u32 * 8));
        }
        assert_eq!(Command::ReadIo.output_shift(), None);
    }

    #[test]
    fn config_layout() {
        assert_eq!(Config::all().bits(), 0xff);
        assert_eq!(Write::config(Config::IO_OE | Config::OD_EN).value, 0b0001_0001);
        assert_eq!(u8::from(Command::Config), 0x24);
    }
}
