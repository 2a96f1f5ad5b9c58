use crate::runtime::error::RuntimeError;
use crate::runtime::method::bound_method;
use crate::runtime::object::{
    IterFactory, ObjectRef, ReprPath, RuntimeObject, ValueIter, with_object, with_object_mut,
};
use crate::runtime::value::Value;
use std::any::Any;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub(crate) struct ListObject {
    values: Vec<Value>,
}

/// Index-based cursor, so values appended mid-iteration are still visited.
struct ListValues {
    list: ObjectRef,
    index: usize,
}

impl ListObject {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn append(&mut self, value: Value) {
        self.values.push(value);
    }

    fn checked_index(&self, index: &Value, operation: &str) -> Result<usize, RuntimeError> {
        let Some(index) = index.as_int() else {
            return Err(RuntimeError::InvalidArgumentType {
                operation: operation.to_string(),
                argument: "index".to_string(),
                expected: "int".to_string(),
                got: index.type_name().to_string(),
            });
        };
        if index < 0 {
            return Err(RuntimeError::NegativeIndex { index });
        }
        let index = index as usize;
        if index >= self.values.len() {
            return Err(RuntimeError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            });
        }
        Ok(index)
    }
}

impl RuntimeObject for ListObject {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "list"
    }

    fn get_attribute(&self, receiver: &ObjectRef, attribute: &str) -> Result<Value, RuntimeError> {
        match attribute {
            "append" => {
                let receiver = receiver.clone();
                Ok(bound_method(move |mut args| {
                    RuntimeError::expect_method_arity("append", 1, args.len())?;
                    let value = args.pop().expect("len checked above");
                    with_object_mut(&receiver, |list: &mut ListObject| list.append(value));
                    Ok(Value::None)
                }))
            }
            "len" => Ok(Value::Int(self.len() as i64)),
            _ => Err(RuntimeError::MissingAttribute {
                type_name: self.type_name().to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }

    fn get_item(&self, key: &Value) -> Result<Value, RuntimeError> {
        let index = self.checked_index(key, "__getitem__")?;
        Ok(self.values[index].clone())
    }

    fn set_item(&mut self, key: Value, value: Value) -> Result<(), RuntimeError> {
        let index = self.checked_index(&key, "__setitem__")?;
        self.values[index] = value;
        Ok(())
    }

    fn repr(&self, identity: usize, visited: &mut ReprPath) -> String {
        if !visited.insert(identity) {
            return "[...]".to_string();
        }
        let rendered = self
            .values
            .iter()
            .map(|value| value.repr_in(visited))
            .collect::<Vec<_>>()
            .join(", ");
        visited.remove(&identity);
        format!("[{rendered}]")
    }

    fn is_hashable(&self) -> bool {
        false
    }

    fn native_iter(&self, receiver: &ObjectRef) -> Option<IterFactory> {
        let receiver = receiver.clone();
        Some(Rc::new(move || -> ValueIter {
            Box::new(ListValues {
                list: receiver.clone(),
                index: 0,
            })
        }))
    }
}

impl Iterator for ListValues {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let value = with_object(&self.list, |list: &ListObject| {
            list.values.get(self.index).cloned()
        })
        .flatten()?;
        self.index += 1;
        Some(value)
    }
}
