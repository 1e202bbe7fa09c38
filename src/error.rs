//! Errors raised by the prediction core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The caller supplied a bad rate, line, count or price.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A collaborator supplied degenerate data, such as an empty table or a zero booksum.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The inputs would exceed the range over which the computation is exact.
    #[error("numeric overflow: {0}")]
    NumericOverflow(String),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn numeric_overflow(message: impl Into<String>) -> Self {
        Self::NumericOverflow(message.into())
    }

    /// Process exit code for a command-line harness: `2` for caller errors, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 2,
            Error::InvalidState(_) | Error::NumericOverflow(_) => 1,
        }
    }
}
