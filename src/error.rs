//! Error handling
//!
use jmespath::{ErrorReason, JmespathError, RuntimeError};
use serde_json::Value;
use thiserror;

use crate::signature::Arity;
use crate::value::{Kind, Kinds};

/// Public error enumeration
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Wrong argument count for '{function}' - expected: {expected}, actual: {actual}")]
    WrongArgumentCount {
        function: String,
        expected: Arity,
        actual: usize,
    },

    #[error("Invalid argument type for '{function}' at position {position} - expected: {expected}, actual: {actual}")]
    InvalidArgumentType {
        function: String,
        position: usize,
        expected: Kinds,
        actual: Kind,
    },

    #[error("Invalid argument for '{function}' at position {position} - expected: {expected}, got: {value}")]
    InvalidArgument {
        function: String,
        position: usize,
        expected: Kinds,
        value: Value,
    },

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Could not evaluate expression: {0}")]
    Expression(#[from] JmespathError),

    #[error("Invalid data - {0}")]
    InvalidData(#[from] serde_json::Error),

    #[error("Encountered an unexpected error: {0}")]
    UnexpectedError(String),
}
/// Prefix of the expected-type text when an `InvalidArgument` is reported
/// through the evaluator, so it stays distinguishable from a kind mismatch.
pub(crate) const INVALID_VALUE_PREFIX: &str = "valid ";

impl Error {
    /// The call's arguments did not satisfy any declared signature.
    ///
    /// Covers the same failures reported by the evaluator as runtime
    /// argument errors.
    pub fn is_argument_error(&self) -> bool {
        match self {
            Self::WrongArgumentCount { .. } | Self::InvalidArgumentType { .. } => true,
            Self::Expression(err) => match &err.reason {
                ErrorReason::Runtime(RuntimeError::TooManyArguments { .. })
                | ErrorReason::Runtime(RuntimeError::NotEnoughArguments { .. }) => true,
                ErrorReason::Runtime(RuntimeError::InvalidType { expected, .. }) => {
                    !expected.starts_with(INVALID_VALUE_PREFIX)
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// An argument had an acceptable kind but was invalid for the function.
    pub fn is_type_error(&self) -> bool {
        match self {
            Self::InvalidArgument { .. } => true,
            Self::Expression(err) => matches!(
                &err.reason,
                ErrorReason::Runtime(RuntimeError::InvalidType { expected, .. })
                    if expected.starts_with(INVALID_VALUE_PREFIX)
            ),
            _ => false,
        }
    }
}
