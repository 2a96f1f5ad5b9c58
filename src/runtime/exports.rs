//! Export aggregation.
//!
//! A module's public surface is its explicit export names plus, for each
//! wildcard re-export source, that source's declared exports or (lacking
//! those) its public top-level names. Runs once while the module
//! initialises.

use indexmap::IndexSet;
use tracing::debug;

use crate::config::{ExportOrder, RuntimeConfig};
use crate::runtime::error::RuntimeError;
use crate::runtime::module::{ModuleLoader, ModuleRef};

/// Computes `module`'s exports and stores them on it.
///
/// Failing to load a wildcard source is fatal for the importing module.
pub fn compute_exports(
    config: &RuntimeConfig,
    loader: &dyn ModuleLoader,
    module: &ModuleRef,
    explicit: &[&str],
    wildcard_sources: &[&str],
) -> Result<Vec<String>, RuntimeError> {
    let importer = module.borrow().name().to_string();
    let mut names = explicit
        .iter()
        .map(|name| name.to_string())
        .collect::<IndexSet<_>>();

    for source in wildcard_sources {
        let source_module =
            loader
                .load(source)
                .map_err(|error| RuntimeError::ExportSourceUnavailable {
                    module: source.to_string(),
                    importer: importer.clone(),
                    reason: error.to_string(),
                })?;
        let source_module = source_module.borrow();
        match source_module.exports() {
            Some(exports) => names.extend(exports.iter().cloned()),
            None => names.extend(
                source_module
                    .global_names()
                    .filter(|name| !config.is_private(name))
                    .map(str::to_string),
            ),
        }
    }

    let mut names = names.into_iter().collect::<Vec<_>>();
    if config.export_order == ExportOrder::Sorted {
        names.sort();
    }
    debug!(module = %importer, count = names.len(), "computed exports");
    module.borrow_mut().set_exports(names.clone());
    Ok(names)
}
