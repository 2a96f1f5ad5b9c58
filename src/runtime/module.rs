//! Modules as seen by export aggregation, and the loader boundary.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

pub type ModuleRef = Rc<RefCell<Module>>;

#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    globals: IndexMap<String, Value>,
    exports: Option<Vec<String>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            globals: IndexMap::new(),
            exports: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.globals.get(name).cloned()
    }

    /// Top-level names in definition order.
    pub fn global_names(&self) -> impl Iterator<Item = &str> {
        self.globals.keys().map(String::as_str)
    }

    /// The declared export list, if the module has one.
    pub fn exports(&self) -> Option<&[String]> {
        self.exports.as_deref()
    }

    pub fn set_exports(&mut self, exports: Vec<String>) {
        self.exports = Some(exports);
    }

    pub fn into_ref(self) -> ModuleRef {
        Rc::new(RefCell::new(self))
    }
}

/// Resolves module names to loaded modules. Implemented by whatever turns
/// source files into executable units.
pub trait ModuleLoader {
    fn load(&self, name: &str) -> Result<ModuleRef, RuntimeError>;
}

/// Loader over modules that are already in memory.
#[derive(Default)]
pub struct ModuleTable {
    modules: FxHashMap<String, ModuleRef>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: Module) -> ModuleRef {
        let module = module.into_ref();
        let name = module.borrow().name().to_string();
        self.modules.insert(name, module.clone());
        module
    }

    pub fn get(&self, name: &str) -> Option<ModuleRef> {
        self.modules.get(name).cloned()
    }
}

impl ModuleLoader for ModuleTable {
    fn load(&self, name: &str) -> Result<ModuleRef, RuntimeError> {
        self.get(name).ok_or_else(|| RuntimeError::ModuleNotFound {
            module: name.to_string(),
        })
    }
}
