use core::{error, fmt};

/// Errors raised by the `fracsmooth-core` helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Argument passed into a helper was invalid.
    InvalidArg {
        /// The invalid arg
        arg: String,
        /// Explaining why arg is invalid.
        reason: String,
    },
    /// Two arrays that must share a shape did not.
    ShapeMismatch {
        /// Shape of the left operand.
        left: Vec<usize>,
        /// Shape of the right operand.
        right: Vec<usize>,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            Error::ShapeMismatch { left, right } => {
                write!(f, "Arrays must have same shapes: {left:?} vs {right:?}")
            }
        }
    }
}

impl error::Error for Error {}

/// Result alias for `fracsmooth-core` helpers.
pub type Result<T> = core::result::Result<T, Error>;
