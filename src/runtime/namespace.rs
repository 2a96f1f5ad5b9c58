//! The entry-point table handed to every compiled unit.

use std::cell::RefCell;

use crate::config::RuntimeConfig;
use crate::runtime::capability::{BuiltinCapability, CapabilityFn, CapabilityRegistry};
use crate::runtime::coalesce::coalesces;
use crate::runtime::error::RuntimeError;
use crate::runtime::exports::compute_exports;
use crate::runtime::iterator::Sequence;
use crate::runtime::matching::{match_error, match_proxy};
use crate::runtime::module::{ModuleLoader, ModuleRef};
use crate::runtime::record::{Record, unpack_record};
use crate::runtime::value::Value;

/// Configuration plus the shared capability registry, with one method per
/// operation compiled code calls by name.
///
/// Registrations are expected while modules initialise; lookups borrow the
/// registry only for the duration of the lookup, so implementations may
/// themselves resolve further capabilities.
#[derive(Default)]
pub struct Namespace {
    config: RuntimeConfig,
    registry: RefCell<CapabilityRegistry>,
}

impl Namespace {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_registry(config, CapabilityRegistry::new())
    }

    pub fn with_registry(config: RuntimeConfig, registry: CapabilityRegistry) -> Self {
        Self {
            config,
            registry: RefCell::new(registry),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn register_capability<F>(
        &self,
        capability: &str,
        kind: &str,
        implementation: F,
    ) -> Option<CapabilityFn>
    where
        F: Fn(&Value, Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    {
        self.registry
            .borrow_mut()
            .register(capability, kind, implementation)
    }

    pub fn resolve_capability(
        &self,
        value: &Value,
        capability: &str,
    ) -> Result<Value, RuntimeError> {
        self.registry.borrow().resolve(value, capability)
    }

    /// Short alias used by generated code.
    pub fn vget(&self, value: &Value, capability: &str) -> Result<Value, RuntimeError> {
        self.resolve_capability(value, capability)
    }

    /// The registry is released before the implementation runs, so it may
    /// register further capabilities.
    pub fn iterate(&self, value: &Value) -> Result<Sequence, RuntimeError> {
        let implementation = self.resolve_capability(value, BuiltinCapability::Iter.name())?;
        let produced = implementation.call(Vec::new())?;
        Sequence::from_iterable(&produced)
    }

    pub fn coalesces(&self, value: &Value) -> bool {
        coalesces(value)
    }

    /// Turns a failed call into an exception value so it can be coalesced.
    pub fn reify(&self, result: Result<Value, RuntimeError>) -> Value {
        Value::from_result(result)
    }

    pub fn match_proxy(&self, value: Value) -> Value {
        match_proxy(value)
    }

    pub fn match_error(&self, message: impl Into<String>) -> RuntimeError {
        match_error(message)
    }

    pub fn record(
        &self,
        pairs: impl IntoIterator<Item = (Value, Value)>,
    ) -> Result<Value, RuntimeError> {
        Ok(Record::from_pairs(pairs)?.into_value())
    }

    pub fn unpack_record(&self, value: &Value) -> Result<Record, RuntimeError> {
        unpack_record(value)
    }

    pub fn compute_exports(
        &self,
        loader: &dyn ModuleLoader,
        module: &ModuleRef,
        explicit: &[&str],
        wildcard_sources: &[&str],
    ) -> Result<Vec<String>, RuntimeError> {
        compute_exports(&self.config, loader, module, explicit, wildcard_sources)
    }
}
