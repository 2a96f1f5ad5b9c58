use crate::runtime::value::Value;

/// Whether `value` counts as absent for the null- and error-coalescing
/// operators: `None` or a reified exception. Falsy values such as `0`, `""`
/// or `False` are present.
pub fn coalesces(value: &Value) -> bool {
    match value {
        Value::None => true,
        Value::Object(object) => object.borrow().as_exception().is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::coalesces;
    use crate::runtime::error::RuntimeError;
    use crate::runtime::record::Record;
    use crate::runtime::value::Value;

    #[test]
    fn none_and_errors_coalesce() {
        assert!(coalesces(&Value::None));
        assert!(coalesces(&Value::from_error(RuntimeError::match_error(
            "no match"
        ))));
        assert!(coalesces(&Value::from_error(RuntimeError::NotIterable {
            type_name: "int".to_string()
        })));
    }

    #[test]
    fn falsy_values_are_present() {
        assert!(!coalesces(&Value::Int(0)));
        assert!(!coalesces(&Value::Float(0.0)));
        assert!(!coalesces(&Value::str("")));
        assert!(!coalesces(&Value::Bool(false)));
        assert!(!coalesces(&Value::tuple(vec![])));
        assert!(!coalesces(&Value::list(vec![])));
        assert!(!coalesces(&Record::new().into_value()));
    }
}
