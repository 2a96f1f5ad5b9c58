use thiserror::Error;

use crate::runtime::exception::{ExceptionKind, RaisedException};

/// Typed failures surfaced by the runtime support layer.
///
/// Every variant names the concrete runtime kind involved so a diagnostic is
/// actionable without the compiled source at hand.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("'{type_name}' object has no attribute '{attribute}'")]
    MissingAttribute {
        type_name: String,
        attribute: String,
    },
    #[error("'{type_name}' object does not support capability '{capability}'")]
    UnsupportedCapability {
        type_name: String,
        capability: String,
    },
    #[error("'{type_name}' object is not iterable")]
    NotIterable { type_name: String },
    #[error("unhashable type: '{type_name}'")]
    UnhashableType { type_name: String },
    #[error("Operation '{operation}' is not supported for type {type_name}")]
    UnsupportedOperation {
        operation: String,
        type_name: String,
    },
    #[error(
        "Invalid argument type for operation '{operation}': '{argument}' expected {expected}, got {got}"
    )]
    InvalidArgumentType {
        operation: String,
        argument: String,
        expected: String,
        got: String,
    },
    #[error("Invalid argument for operation '{operation}': {reason}")]
    InvalidArgument { operation: String, reason: String },
    #[error("Method '{method}' expected {expected} arguments, got {found}")]
    ArityMismatch {
        method: String,
        expected: usize,
        found: usize,
    },
    #[error("List index must be non-negative, got {index}")]
    NegativeIndex { index: i64 },
    #[error("List index out of bounds: index {index}, len {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("'{type_name}' object is not callable")]
    ObjectNotCallable { type_name: String },
    #[error("No module named '{module}'")]
    ModuleNotFound { module: String },
    #[error("Cannot load '{module}' to re-export into '{importer}': {reason}")]
    ExportSourceUnavailable {
        module: String,
        importer: String,
        reason: String,
    },
    #[error("{exception}")]
    Raised { exception: RaisedException },
}

impl RuntimeError {
    pub fn expect_method_arity(
        method: &str,
        expected: usize,
        found: usize,
    ) -> Result<(), RuntimeError> {
        if expected == found {
            return Ok(());
        }
        Err(RuntimeError::ArityMismatch {
            method: method.to_string(),
            expected,
            found,
        })
    }

    pub fn match_error(message: impl Into<String>) -> Self {
        RuntimeError::Raised {
            exception: RaisedException::new(ExceptionKind::MatchError, message.into()),
        }
    }

    /// Exception kind this error takes on once reified as a value.
    pub fn exception_kind(&self) -> ExceptionKind {
        match self {
            RuntimeError::MissingAttribute { .. } => ExceptionKind::AttributeError,
            RuntimeError::UnsupportedCapability { .. }
            | RuntimeError::NotIterable { .. }
            | RuntimeError::UnhashableType { .. }
            | RuntimeError::UnsupportedOperation { .. }
            | RuntimeError::InvalidArgumentType { .. }
            | RuntimeError::ArityMismatch { .. }
            | RuntimeError::ObjectNotCallable { .. } => ExceptionKind::TypeError,
            RuntimeError::InvalidArgument { .. } => ExceptionKind::ValueError,
            RuntimeError::NegativeIndex { .. } | RuntimeError::IndexOutOfBounds { .. } => {
                ExceptionKind::IndexError
            }
            RuntimeError::ModuleNotFound { .. } | RuntimeError::ExportSourceUnavailable { .. } => {
                ExceptionKind::ImportError
            }
            RuntimeError::Raised { exception } => exception.kind,
        }
    }

    pub fn into_exception(self) -> RaisedException {
        match self {
            RuntimeError::Raised { exception } => exception,
            other => RaisedException::new(other.exception_kind(), other.to_string()),
        }
    }
}
