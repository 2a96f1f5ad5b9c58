//! Range specifications: a start/stop/step triple whose stop may be open.

use std::any::Any;

use crate::runtime::error::RuntimeError;
use crate::runtime::object::{ObjectRef, ReprPath, RuntimeObject, ValueIter};
use crate::runtime::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: i64,
    pub stop: Option<i64>,
    pub step: i64,
}

impl RangeSpec {
    /// Builds a range, defaulting `start` to 0 and `step` to 1.
    pub fn new(
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<Self, RuntimeError> {
        let step = step.unwrap_or(1);
        if step == 0 {
            return Err(RuntimeError::InvalidArgument {
                operation: "range".to_string(),
                reason: "step must not be zero".to_string(),
            });
        }
        Ok(Self {
            start: start.unwrap_or(0),
            stop,
            step,
        })
    }

    pub fn bounded(start: i64, stop: i64) -> Self {
        Self {
            start,
            stop: Some(stop),
            step: 1,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.stop.is_some()
    }

    /// Fresh lazy sequence over the range.
    ///
    /// Open ranges run until the integer domain is exhausted.
    pub fn values(&self) -> ValueIter {
        Box::new(RangeValues {
            next: Some(self.start),
            stop: self.stop,
            step: self.step,
        })
    }
}

struct RangeValues {
    next: Option<i64>,
    stop: Option<i64>,
    step: i64,
}

impl Iterator for RangeValues {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let current = self.next?;
        if let Some(stop) = self.stop {
            let in_range = if self.step > 0 {
                current < stop
            } else {
                current > stop
            };
            if !in_range {
                self.next = None;
                return None;
            }
        }
        self.next = current.checked_add(self.step);
        Some(Value::Int(current))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RangeObject {
    spec: RangeSpec,
}

impl RangeObject {
    pub(crate) fn new(spec: RangeSpec) -> Self {
        Self { spec }
    }
}

fn optional_int(value: Option<i64>) -> Value {
    value.map_or(Value::None, Value::Int)
}

impl RuntimeObject for RangeObject {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "range"
    }

    fn get_attribute(&self, _receiver: &ObjectRef, attribute: &str) -> Result<Value, RuntimeError> {
        match attribute {
            "start" => Ok(Value::Int(self.spec.start)),
            "stop" => Ok(optional_int(self.spec.stop)),
            "step" => Ok(Value::Int(self.spec.step)),
            _ => Err(RuntimeError::MissingAttribute {
                type_name: self.type_name().to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }

    fn repr(&self, _identity: usize, _visited: &mut ReprPath) -> String {
        let stop = optional_int(self.spec.stop).repr();
        if self.spec.step == 1 {
            format!("range({}, {stop})", self.spec.start)
        } else {
            format!("range({}, {stop}, {})", self.spec.start, self.spec.step)
        }
    }

    fn range_spec(&self) -> Option<RangeSpec> {
        Some(self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::RangeSpec;
    use crate::runtime::error::RuntimeError;
    use crate::runtime::value::Value;

    fn ints(spec: RangeSpec, take: usize) -> Vec<i64> {
        spec.values()
            .take(take)
            .map(|value| value.as_int().expect("range yields ints"))
            .collect()
    }

    #[test]
    fn bounded_ranges_are_half_open() {
        let spec = RangeSpec::new(None, Some(5), None).expect("valid range");
        assert_eq!(ints(spec, 10), vec![0, 1, 2, 3, 4]);
        let spec = RangeSpec::new(Some(5), Some(0), Some(-2)).expect("valid range");
        assert_eq!(ints(spec, 10), vec![5, 3, 1]);
        assert!(ints(RangeSpec::bounded(3, 3), 10).is_empty());
    }

    #[test]
    fn open_ranges_never_stop_on_their_own() {
        let spec = RangeSpec::new(Some(0), None, Some(2)).expect("valid range");
        assert_eq!(ints(spec, 5), vec![0, 2, 4, 6, 8]);
        let spec = RangeSpec::new(Some(i64::MAX - 1), None, None).expect("valid range");
        assert_eq!(ints(spec, 5), vec![i64::MAX - 1, i64::MAX]);
    }

    #[test]
    fn each_call_starts_over() {
        let spec = RangeSpec::bounded(0, 3);
        let mut first = spec.values();
        first.next();
        assert_eq!(ints(spec, 10), vec![0, 1, 2]);
    }

    #[test]
    fn zero_step_is_rejected() {
        assert_eq!(
            RangeSpec::new(None, Some(3), Some(0)).expect_err("zero step"),
            RuntimeError::InvalidArgument {
                operation: "range".to_string(),
                reason: "step must not be zero".to_string(),
            }
        );
    }

    #[test]
    fn range_values_expose_their_bounds() {
        let range = Value::range(RangeSpec::new(Some(1), None, Some(3)).expect("valid range"));
        assert_eq!(range.type_name(), "range");
        assert_eq!(range.repr(), "range(1, None, 3)");
        assert!(range.get_attribute("stop").expect("stop").is_none());
        assert_eq!(Value::range(RangeSpec::bounded(0, 4)).repr(), "range(0, 4)");
    }
}
