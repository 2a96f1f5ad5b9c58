//! Exception values.
//!
//! Raised conditions travel as `RuntimeError::Raised` while they propagate,
//! and become `ExceptionObject` values when compiled code reifies them as
//! data (for example to feed an error-coalescing operator).

use std::any::Any;
use std::fmt;

use crate::runtime::error::RuntimeError;
use crate::runtime::object::{ObjectRef, ReprPath, RuntimeObject};
use crate::runtime::value::Value;
use crate::runtime::value::repr::str_repr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    Exception,
    AttributeError,
    TypeError,
    ValueError,
    IndexError,
    ImportError,
    StopIteration,
    MatchError,
}

impl ExceptionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Exception => "Exception",
            Self::AttributeError => "AttributeError",
            Self::TypeError => "TypeError",
            Self::ValueError => "ValueError",
            Self::IndexError => "IndexError",
            Self::ImportError => "ImportError",
            Self::StopIteration => "StopIteration",
            Self::MatchError => "MatchError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaisedException {
    pub kind: ExceptionKind,
    pub message: String,
}

impl RaisedException {
    pub fn new(kind: ExceptionKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl fmt::Display for RaisedException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind.name())
        } else {
            write!(f, "{}: {}", self.kind.name(), self.message)
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ExceptionObject {
    exception: RaisedException,
}

impl ExceptionObject {
    pub(crate) fn new(exception: RaisedException) -> Self {
        Self { exception }
    }
}

impl RuntimeObject for ExceptionObject {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        self.exception.kind.name()
    }

    fn get_attribute(&self, _receiver: &ObjectRef, attribute: &str) -> Result<Value, RuntimeError> {
        match attribute {
            "message" => Ok(Value::str(self.exception.message.as_str())),
            _ => Err(RuntimeError::MissingAttribute {
                type_name: self.type_name().to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }

    fn repr(&self, _identity: usize, _visited: &mut ReprPath) -> String {
        if self.exception.message.is_empty() {
            format!("{}()", self.exception.kind.name())
        } else {
            format!(
                "{}({})",
                self.exception.kind.name(),
                str_repr(&self.exception.message)
            )
        }
    }

    fn as_exception(&self) -> Option<&RaisedException> {
        Some(&self.exception)
    }
}
