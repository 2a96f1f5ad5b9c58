//! Capability registry and dispatcher.
//!
//! A capability is a named structural operation (iteration, for now)
//! resolved per concrete value kind. Explicit `(capability, kind)`
//! registrations win; built-in capabilities then fall back to probing the
//! value's structure. The registry is meant to be filled while modules
//! initialise and only read afterwards; it does no locking of its own.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::runtime::error::RuntimeError;
use crate::runtime::iterator::{Sequence, native_iter_of};
use crate::runtime::method::bound_method;
use crate::runtime::object::{IterFactory, ValueIter};
use crate::runtime::range::RangeSpec;
use crate::runtime::value::Value;

/// Implementation registered for one capability on one kind. Receives the
/// value it was resolved against plus the call arguments.
pub type CapabilityFn = Rc<dyn Fn(&Value, Vec<Value>) -> Result<Value, RuntimeError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCapability {
    Iter,
}

impl BuiltinCapability {
    pub fn name(self) -> &'static str {
        match self {
            Self::Iter => "iter",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "iter" => Some(Self::Iter),
            _ => None,
        }
    }
}

/// Which iteration pathway a value offers, probed in priority order.
pub enum IterationSupport {
    RangeLike(RangeSpec),
    PairedEntriesLike(IterFactory),
    NativeIterableLike(IterFactory),
    Unsupported,
}

impl IterationSupport {
    pub fn probe(value: &Value) -> Self {
        if let Value::Object(object) = value {
            let borrowed = object.borrow();
            if let Some(spec) = borrowed.range_spec() {
                return Self::RangeLike(spec);
            }
            if let Some(entries) = borrowed.paired_entries(object) {
                return Self::PairedEntriesLike(entries);
            }
        }
        match native_iter_of(value) {
            Some(values) => Self::NativeIterableLike(values),
            None => Self::Unsupported,
        }
    }

    /// Starts a pass over the probed value.
    pub fn start(self, value: &Value) -> Result<Sequence, RuntimeError> {
        match self {
            Self::RangeLike(spec) => Ok(Sequence::new(spec.values())),
            Self::PairedEntriesLike(values) | Self::NativeIterableLike(values) => {
                Ok(Sequence::new(values()))
            }
            Self::Unsupported => Err(RuntimeError::NotIterable {
                type_name: value.type_name().to_string(),
            }),
        }
    }

    pub fn pathway(&self) -> &'static str {
        match self {
            Self::RangeLike(_) => "range",
            Self::PairedEntriesLike(_) => "paired_entries",
            Self::NativeIterableLike(_) => "native",
            Self::Unsupported => "unsupported",
        }
    }
}

#[derive(Default)]
pub struct CapabilityRegistry {
    by_capability: FxHashMap<String, FxHashMap<String, CapabilityFn>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `implementation` for `capability` on values of kind `kind`,
    /// returning whatever it replaced.
    pub fn register<F>(
        &mut self,
        capability: impl Into<String>,
        kind: impl Into<String>,
        implementation: F,
    ) -> Option<CapabilityFn>
    where
        F: Fn(&Value, Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    {
        let capability = capability.into();
        let kind = kind.into();
        debug!(%capability, %kind, "registering capability");
        self.by_capability
            .entry(capability)
            .or_default()
            .insert(kind, Rc::new(implementation))
    }

    pub fn lookup(&self, capability: &str, kind: &str) -> Option<CapabilityFn> {
        self.by_capability.get(capability)?.get(kind).cloned()
    }

    /// Resolves `capability` for `value` into a callable bound to it.
    pub fn resolve(&self, value: &Value, capability: &str) -> Result<Value, RuntimeError> {
        let kind = value.type_name();
        if let Some(implementation) = self.lookup(capability, kind) {
            trace!(%capability, kind, "resolved registered capability");
            let receiver = value.clone();
            return Ok(bound_method(move |args| implementation(&receiver, args)));
        }
        match BuiltinCapability::from_name(capability) {
            Some(BuiltinCapability::Iter) => resolve_iteration(value),
            None => Err(RuntimeError::UnsupportedCapability {
                type_name: kind.to_string(),
                capability: capability.to_string(),
            }),
        }
    }

    /// Resolves iteration for `value` and starts a fresh pass over it.
    pub fn iterate(&self, value: &Value) -> Result<Sequence, RuntimeError> {
        let implementation = self.resolve(value, BuiltinCapability::Iter.name())?;
        let produced = implementation.call(Vec::new())?;
        Sequence::from_iterable(&produced)
    }
}

fn resolve_iteration(value: &Value) -> Result<Value, RuntimeError> {
    let support = IterationSupport::probe(value);
    trace!(
        kind = value.type_name(),
        pathway = support.pathway(),
        "resolving iteration"
    );
    match support {
        IterationSupport::RangeLike(spec) => Ok(iteration_method("range_iterator", move || {
            spec.values()
        })),
        IterationSupport::PairedEntriesLike(entries) => {
            Ok(iteration_method("record_items", move || entries()))
        }
        IterationSupport::NativeIterableLike(values) => {
            let type_name = native_iterator_name(value);
            Ok(iteration_method(type_name, move || values()))
        }
        IterationSupport::Unsupported => Err(RuntimeError::NotIterable {
            type_name: value.type_name().to_string(),
        }),
    }
}

fn native_iterator_name(value: &Value) -> &'static str {
    match value.type_name() {
        "str" => "str_iterator",
        "tuple" => "tuple_iterator",
        "list" => "list_iterator",
        "Record" => "record_keys",
        _ => "iterator",
    }
}

fn iteration_method(
    type_name: &'static str,
    values: impl Fn() -> ValueIter + 'static,
) -> Value {
    bound_method(move |args| {
        RuntimeError::expect_method_arity("iter", 0, args.len())?;
        Ok(Value::iterator(type_name, values()))
    })
}

#[cfg(test)]
mod tests {
    use super::{BuiltinCapability, CapabilityRegistry, IterationSupport};
    use crate::runtime::error::RuntimeError;
    use crate::runtime::range::RangeSpec;
    use crate::runtime::record::Record;
    use crate::runtime::value::Value;

    fn ints(registry: &CapabilityRegistry, value: &Value, take: usize) -> Vec<i64> {
        registry
            .iterate(value)
            .expect("value should be iterable")
            .take(take)
            .map(|value| value.as_int().expect("expected ints"))
            .collect()
    }

    #[test]
    fn bounded_range_iterates_half_open() {
        let registry = CapabilityRegistry::new();
        let range = Value::range(RangeSpec::new(Some(0), Some(5), Some(1)).expect("valid"));
        assert_eq!(ints(&registry, &range, 10), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn open_range_iterates_forever() {
        let registry = CapabilityRegistry::new();
        let range = Value::range(RangeSpec::new(Some(0), None, Some(2)).expect("valid"));
        assert_eq!(ints(&registry, &range, 5), vec![0, 2, 4, 6, 8]);
        assert_eq!(ints(&registry, &range, 3), vec![0, 2, 4]);
    }

    #[test]
    fn each_invocation_yields_a_fresh_iterator() {
        let registry = CapabilityRegistry::new();
        let range = Value::range(RangeSpec::bounded(0, 3));
        let implementation = registry.resolve(&range, "iter").expect("ranges iterate");
        let first = implementation.call(vec![]).expect("invoke");
        let second = implementation.call(vec![]).expect("invoke");
        assert!(!first.is_same(&second));
        assert_eq!(first.type_name(), "range_iterator");
    }

    #[test]
    fn mappings_iterate_as_pairs() {
        let registry = CapabilityRegistry::new();
        let record = Record::from_pairs(vec![
            (Value::str("a"), Value::Int(1)),
            (Value::str("b"), Value::Int(2)),
        ])
        .expect("hashable keys");
        let pairs = registry
            .iterate(&record.to_value())
            .expect("records iterate")
            .map(|pair| pair.repr())
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec!["('a', 1)", "('b', 2)"]);
        assert_eq!(
            IterationSupport::probe(&record.to_value()).pathway(),
            "paired_entries"
        );
    }

    #[test]
    fn native_iteration_is_the_last_fallback() {
        let registry = CapabilityRegistry::new();
        let list = Value::list(vec![Value::Int(7), Value::Int(8)]);
        assert_eq!(ints(&registry, &list, 10), vec![7, 8]);
        let text = registry
            .iterate(&Value::str("hey"))
            .expect("strings iterate")
            .map(|value| value.to_output())
            .collect::<String>();
        assert_eq!(text, "hey");
    }

    #[test]
    fn non_iterables_fail_with_their_kind() {
        let registry = CapabilityRegistry::new();
        assert_eq!(
            registry
                .resolve(&Value::Float(1.5), "iter")
                .expect_err("floats are not iterable"),
            RuntimeError::NotIterable {
                type_name: "float".to_string()
            }
        );
        assert!(matches!(
            IterationSupport::probe(&Value::None),
            IterationSupport::Unsupported
        ));
    }

    #[test]
    fn unknown_capabilities_fail_immediately() {
        let registry = CapabilityRegistry::new();
        assert_eq!(
            registry
                .resolve(&Value::list(vec![]), "hash")
                .expect_err("unknown capability"),
            RuntimeError::UnsupportedCapability {
                type_name: "list".to_string(),
                capability: "hash".to_string(),
            }
        );
    }

    #[test]
    fn registered_implementations_win_over_probing() {
        let mut registry = CapabilityRegistry::new();
        registry.register("iter", "int", |receiver, _args| {
            let count = receiver.as_int().unwrap_or(0);
            Ok(Value::range(RangeSpec::bounded(0, count)))
        });
        assert_eq!(ints(&registry, &Value::Int(3), 10), vec![0, 1, 2]);

        registry.register("iter", "list", |_receiver, _args| {
            Ok(Value::tuple(vec![Value::Int(42)]))
        });
        assert_eq!(ints(&registry, &Value::list(vec![Value::Int(1)]), 10), vec![42]);
    }

    #[test]
    fn registered_custom_capabilities_receive_arguments() {
        let mut registry = CapabilityRegistry::new();
        let replaced = registry.register("scale", "int", |receiver, args| {
            let factor = args.first().and_then(Value::as_int).unwrap_or(1);
            Ok(Value::Int(receiver.as_int().unwrap_or(0) * factor))
        });
        assert!(replaced.is_none());
        let scale = registry
            .resolve(&Value::Int(6), "scale")
            .expect("registered for int");
        assert_eq!(
            scale.call(vec![Value::Int(7)]).expect("call").as_int(),
            Some(42)
        );
        assert!(registry.lookup("scale", "float").is_none());
        assert!(registry.resolve(&Value::Float(1.0), "scale").is_err());
    }

    #[test]
    fn registered_iteration_must_produce_an_iterable() {
        let mut registry = CapabilityRegistry::new();
        registry.register("iter", "bool", |_receiver, _args| Ok(Value::Int(1)));
        assert_eq!(
            registry
                .iterate(&Value::Bool(true))
                .err()
                .expect("int result is not iterable"),
            RuntimeError::NotIterable {
                type_name: "int".to_string()
            }
        );
    }

    #[test]
    fn iteration_takes_no_arguments() {
        let registry = CapabilityRegistry::new();
        let implementation = registry
            .resolve(&Value::list(vec![]), BuiltinCapability::Iter.name())
            .expect("lists iterate");
        assert_eq!(
            implementation
                .call(vec![Value::None])
                .expect_err("arity checked"),
            RuntimeError::ArityMismatch {
                method: "iter".to_string(),
                expected: 0,
                found: 1,
            }
        );
    }
}
