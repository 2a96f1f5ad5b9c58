use anyhow::{Context, Result, ensure};
use std::path::Path;

use test_support::{Case, load_cases};
use tl_runtime::{Module, ModuleTable, Namespace, RuntimeConfig, Value};

fn build_table(case: &Case) -> ModuleTable {
    let mut table = ModuleTable::new();
    for (name, spec) in &case.spec.modules {
        let mut module = Module::new(name.as_str());
        for global in &spec.globals {
            module.define(global.as_str(), Value::None);
        }
        if let Some(exports) = &spec.exports {
            module.set_exports(exports.clone());
        }
        table.insert(module);
    }
    table
}

fn load_config(case: &Case) -> Result<RuntimeConfig> {
    match &case.spec.config_file {
        Some(file) => RuntimeConfig::from_path(&case.dir.join(file))
            .with_context(|| format!("Loading config for {}", case.name)),
        None => Ok(RuntimeConfig::default()),
    }
}

fn run_case(case: &Case) -> Result<()> {
    let namespace = Namespace::new(load_config(case)?);
    let table = build_table(case);
    let module = table
        .get(&case.spec.module)
        .with_context(|| format!("Missing module {} in {}", case.spec.module, case.name))?;
    let explicit = case
        .spec
        .explicit
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>();
    let wildcard = case
        .spec
        .wildcard
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>();

    let outcome = namespace.compute_exports(&table, &module, &explicit, &wildcard);
    match (&case.spec.expected.exports, &case.spec.expected.error_contains) {
        (Some(expected), _) => {
            let exports =
                outcome.with_context(|| format!("Computing exports for {}", case.name))?;
            ensure!(
                &exports == expected,
                "Case {} exported {:?}, expected {:?}",
                case.name,
                exports,
                expected
            );
            ensure!(
                module.borrow().exports() == Some(expected.as_slice()),
                "Case {} did not store its exports on the module",
                case.name
            );
        }
        (None, Some(fragment)) => {
            let error = match outcome {
                Ok(exports) => anyhow::bail!(
                    "Case {} should have failed but exported {:?}",
                    case.name,
                    exports
                ),
                Err(error) => error.to_string(),
            };
            ensure!(
                error.contains(fragment.as_str()),
                "Case {} failed with '{}', expected it to contain '{}'",
                case.name,
                error,
                fragment
            );
        }
        (None, None) => anyhow::bail!("Case {} has no expectation", case.name),
    }
    Ok(())
}

#[test]
fn runs_export_cases() -> Result<()> {
    let cases = load_cases(Path::new("tests/exports"))?;
    for case in &cases {
        run_case(case)?;
    }
    Ok(())
}

#[test]
fn fixture_files_are_readable() -> Result<()> {
    let cases = load_cases(Path::new("tests/exports"))?;
    for case in cases.iter().filter(|case| case.spec.config_file.is_some()) {
        let file = case.spec.config_file.as_deref().unwrap_or_default();
        let text = case.read_text(file)?;
        RuntimeConfig::from_yaml_str(&text)
            .with_context(|| format!("Parsing config for {}", case.name))?;
    }
    Ok(())
}
