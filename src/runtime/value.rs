//! `Value`, the unit every runtime entry point accepts and returns.
//!
//! Immediate kinds are stored inline; everything with identity or interior
//! mutability lives behind an `ObjectRef` so it can be shared (and form
//! cycles) across records, lists and module globals.

pub(crate) mod key;
pub(crate) mod repr;

use std::fmt;
use std::rc::Rc;

use crate::runtime::error::RuntimeError;
use crate::runtime::exception::{ExceptionObject, RaisedException};
use crate::runtime::iterator::IteratorObject;
use crate::runtime::list::ListObject;
use crate::runtime::object::{
    ObjectRef, ReprPath, RuntimeObject, ValueIter, identity, new_object_ref,
};
use crate::runtime::range::{RangeObject, RangeSpec};
use crate::runtime::record::Record;

pub use key::ValueKey;

#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Tuple(Rc<[Value]>),
    Object(ObjectRef),
}

impl Value {
    pub fn str(value: impl Into<Rc<str>>) -> Self {
        Value::Str(value.into())
    }

    pub fn tuple(values: Vec<Value>) -> Self {
        Value::Tuple(values.into())
    }

    pub fn pair(first: Value, second: Value) -> Self {
        Value::Tuple(Rc::from([first, second]))
    }

    pub fn from_object(object: impl RuntimeObject) -> Self {
        Value::Object(new_object_ref(object))
    }

    pub fn list(values: Vec<Value>) -> Self {
        Value::from_object(ListObject::new(values))
    }

    pub fn range(spec: RangeSpec) -> Self {
        Value::from_object(RangeObject::new(spec))
    }

    pub fn iterator(type_name: &'static str, values: ValueIter) -> Self {
        Value::from_object(IteratorObject::new(type_name, values))
    }

    pub fn exception(exception: RaisedException) -> Self {
        Value::from_object(ExceptionObject::new(exception))
    }

    /// Reifies a raised condition as an exception value.
    pub fn from_error(error: RuntimeError) -> Self {
        Value::exception(error.into_exception())
    }

    pub fn from_result(result: Result<Value, RuntimeError>) -> Self {
        result.unwrap_or_else(Value::from_error)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::Object(object) => object.borrow().type_name(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            Value::Bool(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_exception(&self) -> Option<RaisedException> {
        let object = self.as_object()?.borrow();
        object.as_exception().cloned()
    }

    /// Identity comparison for heap objects, always false for immediates.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(left), Value::Object(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }

    pub fn get_attribute(&self, attribute: &str) -> Result<Value, RuntimeError> {
        match self {
            Value::Object(object) => object.borrow().get_attribute(object, attribute),
            _ => Err(RuntimeError::MissingAttribute {
                type_name: self.type_name().to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }

    pub fn set_attribute(&self, attribute: &str, value: Value) -> Result<(), RuntimeError> {
        match self {
            Value::Object(object) => object.borrow_mut().set_attribute(attribute, value),
            _ => Err(RuntimeError::MissingAttribute {
                type_name: self.type_name().to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }

    pub fn get_item(&self, key: &Value) -> Result<Value, RuntimeError> {
        match self {
            Value::Object(object) => object.borrow().get_item(key),
            Value::Tuple(values) => {
                let index = key.as_int().ok_or_else(|| RuntimeError::InvalidArgumentType {
                    operation: "__getitem__".to_string(),
                    argument: "index".to_string(),
                    expected: "int".to_string(),
                    got: key.type_name().to_string(),
                })?;
                if index < 0 {
                    return Err(RuntimeError::NegativeIndex { index });
                }
                values
                    .get(index as usize)
                    .cloned()
                    .ok_or(RuntimeError::IndexOutOfBounds {
                        index: index as usize,
                        len: values.len(),
                    })
            }
            _ => Err(RuntimeError::UnsupportedOperation {
                operation: "__getitem__".to_string(),
                type_name: self.type_name().to_string(),
            }),
        }
    }

    pub fn set_item(&self, key: Value, value: Value) -> Result<(), RuntimeError> {
        // Record keys may refer back to the record, so they are checked
        // before it is borrowed mutably.
        if let Some(record) = Record::from_value(self) {
            return record.set_item(key, value);
        }
        match self {
            Value::Object(object) => object.borrow_mut().set_item(key, value),
            _ => Err(RuntimeError::UnsupportedOperation {
                operation: "__setitem__".to_string(),
                type_name: self.type_name().to_string(),
            }),
        }
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match self {
            Value::Object(object) => {
                let object = object.clone();
                let callee = object.borrow();
                callee.call(args)
            }
            _ => Err(RuntimeError::ObjectNotCallable {
                type_name: self.type_name().to_string(),
            }),
        }
    }

    /// Literal-like rendering used by record formatting and diagnostics.
    pub fn repr(&self) -> String {
        self.repr_in(&mut ReprPath::default())
    }

    pub(crate) fn repr_in(&self, visited: &mut ReprPath) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => repr::float_repr(*value),
            Value::Str(value) => repr::str_repr(value),
            Value::Tuple(values) => match values.as_ref() {
                [] => "()".to_string(),
                [single] => format!("({},)", single.repr_in(visited)),
                values => {
                    let rendered = values
                        .iter()
                        .map(|value| value.repr_in(visited))
                        .collect::<Vec<_>>();
                    format!("({})", rendered.join(", "))
                }
            },
            Value::Object(object) => object.borrow().repr(identity(object), visited),
        }
    }

    /// Text used when printing: strings are shown raw, everything else as
    /// its repr.
    pub fn to_output(&self) -> String {
        match self {
            Value::Str(value) => value.to_string(),
            _ => self.repr(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(value) => write!(f, "Bool({value})"),
            Value::Int(value) => write!(f, "Int({value})"),
            Value::Float(value) => write!(f, "Float({value})"),
            Value::Str(value) => write!(f, "Str({value:?})"),
            Value::Tuple(values) => f.debug_tuple("Tuple").field(values).finish(),
            Value::Object(object) => write!(
                f,
                "Object(<{} at {:#x}>)",
                object.borrow().type_name(),
                identity(object)
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_output())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::str(value)
    }
}
