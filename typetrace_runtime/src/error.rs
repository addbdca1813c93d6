//! Runtime error types
//!
//! Errors raised by host values while traced code runs: calling a
//! non-function, iterating a non-iterable, re-entering a running generator.

use thiserror::Error;

/// Runtime error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Type mismatch error
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Value is not callable
    #[error("TypeError: {0} is not a function")]
    NotCallable(String),

    /// Value has no iterator
    #[error("TypeError: {0} is not iterable")]
    NotIterable(String),

    /// Unimplemented feature
    #[error("UnimplementedError: {0}")]
    Unimplemented(String),

    /// Exception thrown by user code
    #[error("{0}")]
    Custom(String),
}

impl RuntimeError {
    /// Create a type error
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        RuntimeError::TypeError(msg.into())
    }

    /// Create a not-callable error naming the offending value
    pub fn not_callable<S: Into<String>>(what: S) -> Self {
        RuntimeError::NotCallable(what.into())
    }

    /// Create a not-iterable error naming the offending value
    pub fn not_iterable<S: Into<String>>(what: S) -> Self {
        RuntimeError::NotIterable(what.into())
    }

    /// Create an unimplemented error
    pub fn unimplemented<S: Into<String>>(feature: S) -> Self {
        RuntimeError::Unimplemented(feature.into())
    }

    /// Create a custom error
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        RuntimeError::Custom(msg.into())
    }
}

/// Result type alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RuntimeError::type_error("generator is already running");
        assert_eq!(format!("{}", err), "TypeError: generator is already running");

        let err = RuntimeError::not_iterable("number");
        assert_eq!(format!("{}", err), "TypeError: number is not iterable");

        let err = RuntimeError::not_callable("undefined");
        assert_eq!(format!("{}", err), "TypeError: undefined is not a function");
    }
}
