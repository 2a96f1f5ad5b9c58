use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::Value;
use crate::runtime::error::RuntimeError;

/// A `Value` admitted as a mapping key.
///
/// Numbers compare by value across `bool`, `int` and `float`, so `True`,
/// `1` and `1.0` name the same entry. Heap objects compare by identity.
#[derive(Debug, Clone)]
pub struct ValueKey(Value);

impl ValueKey {
    pub fn new(value: Value) -> Result<Self, RuntimeError> {
        ensure_hashable(&value)?;
        Ok(Self(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<&str> for ValueKey {
    fn from(value: &str) -> Self {
        Self(Value::str(value))
    }
}

fn ensure_hashable(value: &Value) -> Result<(), RuntimeError> {
    match value {
        Value::Tuple(values) => values.iter().try_for_each(ensure_hashable),
        Value::Object(object) if !object.borrow().is_hashable() => {
            Err(RuntimeError::UnhashableType {
                type_name: value.type_name().to_string(),
            })
        }
        _ => Ok(()),
    }
}

fn integral(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(value) => Some(i64::from(*value)),
        Value::Int(value) => Some(*value),
        _ => None,
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::None => state.write_u8(0),
        Value::Bool(value) => i64::from(*value).hash(state),
        Value::Int(value) => value.hash(state),
        Value::Float(value) => match integral(*value) {
            Some(value) => value.hash(state),
            None if value.is_nan() => f64::NAN.to_bits().hash(state),
            None => value.to_bits().hash(state),
        },
        Value::Str(value) => value.hash(state),
        Value::Tuple(values) => {
            state.write_usize(values.len());
            for value in values.iter() {
                hash_value(value, state);
            }
        }
        Value::Object(object) => Rc::as_ptr(object).hash(state),
    }
}

fn key_equals(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::None, Value::None) => true,
        (Value::Int(left), Value::Int(right)) => left == right,
        (Value::Str(left), Value::Str(right)) => left == right,
        (Value::Tuple(left), Value::Tuple(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(left, right)| key_equals(left, right))
        }
        (Value::Object(left), Value::Object(right)) => Rc::ptr_eq(left, right),
        (Value::Float(left), Value::Float(right)) => {
            left == right || (left.is_nan() && right.is_nan())
        }
        // Exact: a float equals an int only when it is that integer.
        (Value::Float(float), other) | (other, Value::Float(float)) => {
            integer(other).is_some_and(|int| integral(*float) == Some(int))
        }
        _ => match (integer(lhs), integer(rhs)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        },
    }
}

impl Hash for ValueKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.0, state);
    }
}

impl PartialEq for ValueKey {
    fn eq(&self, other: &Self) -> bool {
        key_equals(&self.0, &other.0)
    }
}

impl Eq for ValueKey {}
