use thiserror::Error;

/// Errors reported by the `CH423` driver.
///
/// None of them are fatal: after any error the cached register state still matches what the chip
/// last accepted, so the driver can keep being used.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// A bus transaction failed.  The error of the bus implementation is passed through as-is.
    #[error("bus transaction failed: {0:?}")]
    Bus(E),
    /// The request contradicts the pin group, e.g. making an output-only line an input.
    #[error("invalid argument for this line")]
    InvalidArgument,
    /// The pin group does not offer this capability, e.g. reading an output-only line.
    #[error("operation not supported by this line")]
    Unsupported,
    /// There is no such line.  The `CH423` has 24 of them.
    #[error("line {0} does not exist")]
    InvalidLine(u8),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Bus(e)
    }
}

impl<E: core::fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_errors_convert() {
        let e: Error<u8> = 7u8.into();
        assert_eq!(e, Error::Bus(7));
        assert_eq!(
            embedded_hal::digital::Error::kind(&Error::<u8>::Unsupported),
            embedded_hal::digital::ErrorKind::Other
        );
    }
}
