//! Runtime support library for compiled programs.
//!
//! Compiled code calls into this module by name: records and their
//! rendering, capability dispatch and iteration, null-coalescing, pattern
//! matching helpers, and export aggregation. `Namespace` bundles the entry
//! points behind one table.
pub mod capability;
pub mod coalesce;
pub mod error;
pub mod exception;
pub mod exports;
pub mod iterator;
pub(crate) mod list;
pub mod matching;
pub(crate) mod method;
pub mod module;
pub mod namespace;
pub mod object;
pub mod range;
pub mod record;
pub mod value;
