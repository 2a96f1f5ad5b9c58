pub mod config;
pub mod runtime;

pub use config::{ConfigError, ExportOrder, RuntimeConfig};
pub use runtime::capability::{CapabilityRegistry, IterationSupport};
pub use runtime::error::RuntimeError;
pub use runtime::exception::{ExceptionKind, RaisedException};
pub use runtime::iterator::Sequence;
pub use runtime::module::{Module, ModuleLoader, ModuleRef, ModuleTable};
pub use runtime::namespace::Namespace;
pub use runtime::range::RangeSpec;
pub use runtime::record::{Record, unpack_record};
pub use runtime::value::{Value, ValueKey};
