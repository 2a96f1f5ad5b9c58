//! Heap object protocol shared by every non-immediate value kind.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::runtime::error::RuntimeError;
use crate::runtime::exception::RaisedException;
use crate::runtime::range::RangeSpec;
use crate::runtime::value::Value;

pub type ObjectRef = Rc<RefCell<Box<dyn RuntimeObject>>>;

/// Lazy sequence of values produced by an iteration pathway.
pub type ValueIter = Box<dyn Iterator<Item = Value>>;

/// Produces a fresh `ValueIter` on every call.
pub type IterFactory = Rc<dyn Fn() -> ValueIter>;

/// Identities of the containers on the active formatting path.
pub type ReprPath = FxHashSet<usize>;

pub fn new_object_ref(object: impl RuntimeObject) -> ObjectRef {
    Rc::new(RefCell::new(Box::new(object)))
}

/// Stable identity of a heap object for as long as it is referenced.
pub fn identity(object: &ObjectRef) -> usize {
    Rc::as_ptr(object) as *const () as usize
}

/// Behaviour of one concrete heap kind.
///
/// Only `as_any`, `as_any_mut` and `type_name` are mandatory; every other
/// operation defaults to the failure a kind without that feature reports.
/// The three iteration hooks are probed in order by the capability
/// dispatcher: `range_spec`, then `paired_entries`, then `native_iter`.
pub trait RuntimeObject: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn type_name(&self) -> &'static str;

    fn get_attribute(&self, _receiver: &ObjectRef, attribute: &str) -> Result<Value, RuntimeError> {
        Err(RuntimeError::MissingAttribute {
            type_name: self.type_name().to_string(),
            attribute: attribute.to_string(),
        })
    }

    fn set_attribute(&mut self, attribute: &str, _value: Value) -> Result<(), RuntimeError> {
        Err(RuntimeError::MissingAttribute {
            type_name: self.type_name().to_string(),
            attribute: attribute.to_string(),
        })
    }

    fn get_item(&self, _key: &Value) -> Result<Value, RuntimeError> {
        Err(RuntimeError::UnsupportedOperation {
            operation: "__getitem__".to_string(),
            type_name: self.type_name().to_string(),
        })
    }

    fn set_item(&mut self, _key: Value, _value: Value) -> Result<(), RuntimeError> {
        Err(RuntimeError::UnsupportedOperation {
            operation: "__setitem__".to_string(),
            type_name: self.type_name().to_string(),
        })
    }

    fn call(&self, _args: Vec<Value>) -> Result<Value, RuntimeError> {
        Err(RuntimeError::ObjectNotCallable {
            type_name: self.type_name().to_string(),
        })
    }

    /// Literal-like rendering. Containers consult `visited` to stop at
    /// objects already being rendered further up the path.
    fn repr(&self, _identity: usize, _visited: &mut ReprPath) -> String {
        format!("<{} object>", self.type_name())
    }

    fn is_hashable(&self) -> bool {
        true
    }

    fn range_spec(&self) -> Option<RangeSpec> {
        None
    }

    fn paired_entries(&self, _receiver: &ObjectRef) -> Option<IterFactory> {
        None
    }

    fn native_iter(&self, _receiver: &ObjectRef) -> Option<IterFactory> {
        None
    }

    fn as_exception(&self) -> Option<&RaisedException> {
        None
    }
}

/// Runs `f` against the concrete object behind `receiver`.
///
/// Returns `None` when the object is of another kind.
pub(crate) fn with_object<T: RuntimeObject, R>(
    receiver: &ObjectRef,
    f: impl FnOnce(&T) -> R,
) -> Option<R> {
    let object = receiver.borrow();
    object.as_any().downcast_ref::<T>().map(f)
}

pub(crate) fn with_object_mut<T: RuntimeObject, R>(
    receiver: &ObjectRef,
    f: impl FnOnce(&mut T) -> R,
) -> Option<R> {
    let mut object = receiver.borrow_mut();
    object.as_any_mut().downcast_mut::<T>().map(f)
}
