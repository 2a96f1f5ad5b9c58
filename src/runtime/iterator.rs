//! Iterator objects and the `Sequence` handed back to compiled code.

use std::any::Any;
use std::rc::Rc;

use crate::runtime::capability::IterationSupport;
use crate::runtime::error::RuntimeError;
use crate::runtime::object::{IterFactory, ObjectRef, RuntimeObject, ValueIter, with_object_mut};
use crate::runtime::value::Value;

/// A single pass over some values. Iterating it again continues where the
/// previous pass stopped.
pub(crate) struct IteratorObject {
    type_name: &'static str,
    values: ValueIter,
}

impl IteratorObject {
    pub(crate) fn new(type_name: &'static str, values: ValueIter) -> Self {
        Self { type_name, values }
    }
}

impl RuntimeObject for IteratorObject {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn native_iter(&self, receiver: &ObjectRef) -> Option<IterFactory> {
        let receiver = receiver.clone();
        Some(Rc::new(move || -> ValueIter {
            Box::new(SharedValues(receiver.clone()))
        }))
    }
}

struct SharedValues(ObjectRef);

impl Iterator for SharedValues {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        with_object_mut(&self.0, |iterator: &mut IteratorObject| iterator.values.next()).flatten()
    }
}

/// Native iteration for immediates and heap objects alike.
pub(crate) fn native_iter_of(value: &Value) -> Option<IterFactory> {
    match value {
        Value::Str(text) => {
            let text = text.clone();
            Some(Rc::new(move || -> ValueIter {
                let chars = text
                    .chars()
                    .map(|c| Value::str(c.to_string()))
                    .collect::<Vec<_>>();
                Box::new(chars.into_iter())
            }))
        }
        Value::Tuple(values) => {
            let values = values.clone();
            Some(Rc::new(move || -> ValueIter {
                let values = values.clone();
                Box::new((0..values.len()).map(move |index| values[index].clone()))
            }))
        }
        Value::Object(object) => object.borrow().native_iter(object),
        _ => None,
    }
}

/// Lazy, possibly unbounded sequence of values.
pub struct Sequence {
    values: ValueIter,
}

impl Sequence {
    pub(crate) fn new(values: ValueIter) -> Self {
        Self { values }
    }

    /// Iterates whatever an iteration implementation returned: iterator
    /// objects are consumed in place, other iterables start a fresh pass.
    pub fn from_iterable(value: &Value) -> Result<Self, RuntimeError> {
        IterationSupport::probe(value).start(value)
    }
}

impl Iterator for Sequence {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.values.next()
    }
}
