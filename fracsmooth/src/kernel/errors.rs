use core::fmt;

/// Validation errors raised at kernel construction or adapter binding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input or configuration field is empty.
    EmptyInput {
        /// Name of the argument that is empty.
        arg: &'static str,
    },
    /// A configuration argument value is invalid.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// An array could not be viewed with the required layout.
    Layout {
        /// Name of the argument with the unusable layout.
        arg: &'static str,
    },
    /// Input lengths did not agree with each other.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyInput { arg } => write!(f, "Input `{arg}` was empty."),
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::Layout { arg } => {
                write!(f, "Argument `{arg}` cannot be viewed as (channels, bins).")
            }
            ConfigError::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// An execution precondition was violated.
    InvalidState {
        /// Human readable reason.
        reason: &'static str,
    },
    /// A buffer shape mismatched the expected `(channels, bins)` runtime shape.
    ShapeMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required shape.
        expected: (usize, usize),
        /// Received shape.
        got: (usize, usize),
    },
    /// Adapter binding/configuration failure.
    Config(ConfigError),
    /// Failure raised by a `fracsmooth-core` array helper.
    Numeric(fracsmooth_core::Error),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<fracsmooth_core::Error> for ExecInvariantViolation {
    fn from(value: fracsmooth_core::Error) -> Self {
        Self::Numeric(value)
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecInvariantViolation::ShapeMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Execution shape mismatch on `{arg}`. Expected {expected:?}, got {got:?}."
                )
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
            ExecInvariantViolation::Numeric(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ExecInvariantViolation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecInvariantViolation::Config(err) => Some(err),
            ExecInvariantViolation::Numeric(err) => Some(err),
            ExecInvariantViolation::InvalidState { .. }
            | ExecInvariantViolation::ShapeMismatch { .. } => None,
        }
    }
}
