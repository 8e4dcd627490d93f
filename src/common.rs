use crate::protocol::Config;
use crate::Error;

/// Number of logical lines: IO0..IO7 followed by OC0..OC15.
pub const LINE_COUNT: u8 = 24;

/// Direction of the bidirectional group (IO0..IO7).
///
/// The `CH423` cannot configure the direction per pin; all eight IO lines are either inputs or
/// outputs.  OC lines are always outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub(crate) fn of(config: Config) -> Self {
        if config.contains(Config::IO_OE) {
            Direction::Output
        } else {
            Direction::Input
        }
    }
}

/// Output stage of the output-only lines (OC0..OC15), shared by all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    PushPull,
    OpenDrain,
}

impl DriveMode {
    pub(crate) fn of(config: Config) -> Self {
        if config.contains(Config::OD_EN) {
            DriveMode::OpenDrain
        } else {
            DriveMode::PushPull
        }
    }
}

/// The group a logical line belongs to.  Each group has its own set of capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinGroup {
    /// IO0..IO7 (lines 0..=7): readable, direction switchable as a group.
    Bidirectional,
    /// OC0..OC7 (lines 8..=15): output only.
    OutputLowByte,
    /// OC8..OC15 (lines 16..=23): output only.
    OutputHighByte,
}

impl PinGroup {
    /// Classify `line`, or `None` if the chip has no such line.
    pub fn of(line: u8) -> Option<Self> {
        match line {
            0..=7 => Some(PinGroup::Bidirectional),
            8..=15 => Some(PinGroup::OutputLowByte),
            16..=23 => Some(PinGroup::OutputHighByte),
            _ => None,
        }
    }

    /// Like [`PinGroup::of`], with lines the chip does not have turned into an error.
    pub(crate) fn checked<E>(line: u8) -> Result<Self, Error<E>> {
        Self::of(line).ok_or(Error::InvalidLine(line))
    }

    pub fn is_output_only(self) -> bool {
        !matches!(self, PinGroup::Bidirectional)
    }
}
