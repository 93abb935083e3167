//! Error types for operation lookup and evaluation.

use dm_core::CoreError;
use thiserror::Error;

use crate::operation::{ArgKind, Arity};

/// Result type for operation evaluation.
pub type OpResult<T> = Result<T, OpError>;

/// Errors raised while resolving or applying an operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OpError {
    /// The operation text was blank.
    #[error("Empty operation")]
    Empty,

    /// No handler is registered under this name.
    #[error("Unknown operation '{name}'")]
    UnknownOperation { name: String },

    /// A literal argument could not be parsed as the declared kind.
    #[error("Invalid argument '{raw}': expected {expected}")]
    InvalidArgument { raw: String, expected: ArgKind },

    /// Wrong number of literal arguments.
    #[error("Operation '{name}' takes {expected} argument(s), got {got}")]
    ArgumentCount {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of upstream inputs.
    #[error("Operation '{name}' takes {expected} input(s), got {got}")]
    InputCount {
        name: String,
        expected: Arity,
        got: usize,
    },

    /// A handler read a literal that was not supplied or has another kind.
    #[error("Missing {expected} argument at position {index}")]
    MissingArgument { index: usize, expected: ArgKind },

    /// Integer arithmetic left the range of the value type.
    #[error("Integer overflow in {what}")]
    Overflow { what: &'static str },

    #[error(transparent)]
    Numeric(#[from] CoreError),
}
