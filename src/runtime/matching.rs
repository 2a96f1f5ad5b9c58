//! Support for compiled `match` constructs.

use std::any::Any;

use crate::runtime::error::RuntimeError;
use crate::runtime::object::{ObjectRef, ReprPath, RuntimeObject};
use crate::runtime::value::Value;

/// Field under which a match proxy exposes its scrutinee.
pub const MATCH_PROXY_FIELD: &str = "value";

/// Attribute-accessible holder for a scrutinee, so generated patterns can
/// read `proxy.value` whatever the scrutinee's kind.
#[derive(Debug, Clone)]
struct MatchProxyObject {
    value: Value,
}

impl RuntimeObject for MatchProxyObject {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "MatchProxy"
    }

    fn get_attribute(&self, _receiver: &ObjectRef, attribute: &str) -> Result<Value, RuntimeError> {
        if attribute == MATCH_PROXY_FIELD {
            return Ok(self.value.clone());
        }
        Err(RuntimeError::MissingAttribute {
            type_name: self.type_name().to_string(),
            attribute: attribute.to_string(),
        })
    }

    fn repr(&self, _identity: usize, visited: &mut ReprPath) -> String {
        format!("MatchProxy({MATCH_PROXY_FIELD}={})", self.value.repr_in(visited))
    }
}

pub fn match_proxy(value: Value) -> Value {
    Value::from_object(MatchProxyObject { value })
}

/// Error raised when no case of a compiled match accepts the scrutinee.
pub fn match_error(message: impl Into<String>) -> RuntimeError {
    RuntimeError::match_error(message)
}

#[cfg(test)]
mod tests {
    use super::{match_error, match_proxy};
    use crate::runtime::error::RuntimeError;
    use crate::runtime::exception::ExceptionKind;
    use crate::runtime::record::Record;
    use crate::runtime::value::Value;

    #[test]
    fn proxy_exposes_any_scrutinee_as_value() {
        for scrutinee in [Value::Int(3), Value::str("s"), Value::None] {
            let proxy = match_proxy(scrutinee.clone());
            assert_eq!(proxy.type_name(), "MatchProxy");
            assert_eq!(
                proxy.get_attribute("value").expect("value field").repr(),
                scrutinee.repr()
            );
        }
    }

    #[test]
    fn proxy_keeps_object_identity() {
        let record = Record::new().into_value();
        let proxy = match_proxy(record.clone());
        assert!(proxy.get_attribute("value").expect("value").is_same(&record));
        assert_eq!(proxy.repr(), "MatchProxy(value={})");
    }

    #[test]
    fn proxy_has_no_other_fields() {
        assert_eq!(
            match_proxy(Value::Int(1))
                .get_attribute("other")
                .expect_err("only value is exposed"),
            RuntimeError::MissingAttribute {
                type_name: "MatchProxy".to_string(),
                attribute: "other".to_string(),
            }
        );
    }

    #[test]
    fn match_error_is_its_own_kind() {
        let error = match_error("no case matched 5");
        assert_eq!(error.exception_kind(), ExceptionKind::MatchError);
        assert_eq!(
            Value::from_error(error).type_name(),
            "MatchError"
        );
    }
}
