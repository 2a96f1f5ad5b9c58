use std::any::Any;
use std::rc::Rc;

use crate::runtime::error::RuntimeError;
use crate::runtime::object::RuntimeObject;
use crate::runtime::value::Value;

pub(crate) type NativeMethod = Rc<dyn Fn(Vec<Value>) -> Result<Value, RuntimeError>>;

/// Callable with its receiver already captured.
pub(crate) struct BoundMethodObject {
    callable: NativeMethod,
}

impl RuntimeObject for BoundMethodObject {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "method"
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.callable)(args)
    }
}

pub(crate) fn bound_method<F>(callable: F) -> Value
where
    F: Fn(Vec<Value>) -> Result<Value, RuntimeError> + 'static,
{
    Value::from_object(BoundMethodObject {
        callable: Rc::new(callable),
    })
}
