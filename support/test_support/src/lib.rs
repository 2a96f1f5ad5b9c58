use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// One module in a case's in-memory module table.
#[derive(Debug, Deserialize, Clone)]
pub struct ModuleSpec {
    #[serde(default)]
    pub globals: Vec<String>,
    pub exports: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExpectedOutcome {
    pub exports: Option<Vec<String>>,
    pub error_contains: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseSpec {
    /// Name of the module whose exports are computed.
    pub module: String,
    #[serde(default)]
    pub explicit: Vec<String>,
    #[serde(default)]
    pub wildcard: Vec<String>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleSpec>,
    /// Optional runtime config file, relative to the case directory.
    pub config_file: Option<String>,
    pub expected: ExpectedOutcome,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub spec: CaseSpec,
}

impl Case {
    pub fn read_text(&self, relative_path: &str) -> Result<String> {
        fs::read_to_string(self.dir.join(relative_path))
            .with_context(|| format!("Reading {} fixture file {}", self.name, relative_path))
    }
}

pub fn load_cases(cases_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();

    for entry in
        fs::read_dir(cases_dir).with_context(|| format!("Reading {}", cases_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let case_path = path.join("case.yaml");
        if !case_path.exists() {
            continue;
        }

        let case_name = path
            .file_name()
            .and_then(|value| value.to_str())
            .map(str::to_string)
            .with_context(|| format!("Invalid case directory name {}", path.display()))?;
        let case_raw = fs::read_to_string(&case_path)
            .with_context(|| format!("Reading {}", case_path.display()))?;
        let spec: CaseSpec = serde_yaml::from_str(&case_raw)
            .with_context(|| format!("Parsing {}", case_path.display()))?;
        ensure!(
            spec.expected.exports.is_some() != spec.expected.error_contains.is_some(),
            "Case {} must expect exactly one of exports or error_contains",
            case_name
        );
        ensure!(
            spec.modules.contains_key(&spec.module),
            "Case {} does not define its own module '{}'",
            case_name,
            spec.module
        );

        cases.push(Case {
            name: case_name,
            dir: path,
            spec,
        });
    }

    ensure!(
        !cases.is_empty(),
        "No test cases found in {}",
        cases_dir.display()
    );
    cases.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(cases)
}
