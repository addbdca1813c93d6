//! Error types for instrumentation and trace collection

use thiserror::Error;
use typetrace_parser::ParseError;
use typetrace_runtime::RuntimeError;

use crate::trace::CallId;

/// Errors raised by the instrumentation pass, the collector and the session
#[derive(Debug, Error)]
pub enum TraceError {
    /// Module source failed to parse; fatal for the module
    #[error("failed to parse {module}: {error}")]
    Parse {
        module: String,
        #[source]
        error: ParseError,
    },

    /// Internal compiler bug; the module produces no output
    #[error("internal error in {module}: {message}")]
    InvariantViolation { module: String, message: String },

    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A hook was called with an id no in-flight call owns
    #[error("unknown call id {0}")]
    UnknownCall(CallId),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl TraceError {
    pub fn parse(module: impl Into<String>, error: ParseError) -> Self {
        TraceError::Parse {
            module: module.into(),
            error,
        }
    }

    pub fn invariant(module: impl Into<String>, message: impl Into<String>) -> Self {
        TraceError::InvariantViolation {
            module: module.into(),
            message: message.into(),
        }
    }

    pub fn not_implemented(what: impl Into<String>) -> Self {
        TraceError::NotImplemented(what.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        TraceError::Config(message.into())
    }
}

pub type TraceResult<T> = Result<T, TraceError>;

impl From<TraceError> for RuntimeError {
    /// Hook failures surface to traced code as runtime errors
    fn from(err: TraceError) -> Self {
        match err {
            TraceError::Runtime(inner) => inner,
            other => RuntimeError::custom(other.to_string()),
        }
    }
}
