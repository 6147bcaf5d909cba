use std::fmt;

use crate::binding::MAX_ARITY;

/// Errors that can occur when calling a registered function
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    /// No binding with that name (or id) exists in the group
    #[error("function '{name}' not found in group '{group}'")]
    NotFound { group: String, name: String },

    /// The binding has no overload taking this many arguments
    #[error("function '{name}' cannot be called with {got} argument(s); accepts {accepted:?}")]
    ArityMismatch {
        name: String,
        got: usize,
        accepted: Vec<usize>,
    },

    /// No trial type combination matched the arguments, or the result could
    /// not be unerased as the requested type
    #[error("type mismatch calling '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// The callable itself failed (returned `Err` or panicked)
    #[error("function '{name}' failed: {message}")]
    InvocationFailed { name: String, message: String },

    /// More arguments than the erased-call path implements
    #[error("{got} arguments exceeds the supported maximum of {max}", max = MAX_ARITY)]
    UnsupportedArity { got: usize },
}

/// The kind of a [`CallError`], without its message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    ArityMismatch,
    TypeMismatch,
    InvocationFailed,
    UnsupportedArity,
}

impl CallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CallError::NotFound { .. } => ErrorKind::NotFound,
            CallError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            CallError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CallError::InvocationFailed { .. } => ErrorKind::InvocationFailed,
            CallError::UnsupportedArity { .. } => ErrorKind::UnsupportedArity,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::ArityMismatch => write!(f, "arity mismatch"),
            ErrorKind::TypeMismatch => write!(f, "type mismatch"),
            ErrorKind::InvocationFailed => write!(f, "invocation failed"),
            ErrorKind::UnsupportedArity => write!(f, "unsupported arity"),
        }
    }
}
