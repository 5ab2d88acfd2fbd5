use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, AsmSyntax, Denylist, RedefinitionPolicy};
use crate::suite::render::RenderOptions;
use crate::suite::{
    is_safe_suite_name, SuiteOptions, DEFAULT_MAX_REPORTED_DIFFERENCES, DEFAULT_TRIAL_COUNT,
};

/// Serializable configuration for an analysis + generation run.
///
/// Loaded from YAML (`.yaml` / `.yml`) or JSON (`.json`). Every field is
/// optional; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Name used in listing titles and generated suite headers.
    pub suite_name: String,
    /// Randomized trials per function.
    pub trial_count: u32,
    /// Differences printed per failing trial.
    pub max_reported_differences: usize,
    /// Routines excluded from testing (table-driven dispatchers).
    pub denylist: Denylist,
    pub redefinition: RedefinitionPolicy,
    /// Default renderer name (`rust`, `kotlin`, `json`).
    pub format: String,
    pub syntax: AsmSyntax,
    pub render: RenderOptions,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            suite_name: "Functions".to_string(),
            trial_count: DEFAULT_TRIAL_COUNT,
            max_reported_differences: DEFAULT_MAX_REPORTED_DIFFERENCES,
            denylist: Denylist::default(),
            redefinition: RedefinitionPolicy::default(),
            format: "rust".to_string(),
            syntax: AsmSyntax::default(),
            render: RenderOptions::default(),
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.suite_name.trim().is_empty() {
            return Err(anyhow!("Config 'suite_name' must not be empty"));
        }
        if !is_safe_suite_name(&self.suite_name) {
            return Err(anyhow!(
                "Config 'suite_name' may only contain letters, digits, spaces, '_', '-' and '.'"
            ));
        }
        if self.trial_count == 0 {
            return Err(anyhow!("Config 'trial_count' must be at least 1"));
        }
        if self.syntax.call_mnemonics.is_empty() {
            return Err(anyhow!("Config 'syntax.call_mnemonics' must list at least one mnemonic"));
        }
        if self.syntax.return_mnemonics.is_empty() {
            return Err(anyhow!(
                "Config 'syntax.return_mnemonics' must list at least one mnemonic"
            ));
        }
        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            syntax: self.syntax.clone(),
            denylist: self.denylist.clone(),
            redefinition: self.redefinition,
        }
    }

    pub fn suite_options(&self) -> SuiteOptions {
        SuiteOptions {
            suite_name: self.suite_name.clone(),
            trial_count: self.trial_count,
            max_reported_differences: self.max_reported_differences,
        }
    }
}

/// Load and validate a config file, choosing the format from the extension.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    let body = fs::read(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config: HarnessConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_slice(&body).context("Failed to parse config JSON")?,
        Some("yaml") | Some("yml") => {
            serde_yaml::from_slice(&body).context("Failed to parse config YAML")?
        }
        other => {
            return Err(anyhow!(
                "Unsupported config format '{}' (expected .yaml, .yml or .json)",
                other.unwrap_or("")
            ))
        }
    };
    config.validate()?;
    Ok(config)
}

/// Load `path` if given, otherwise fall back to defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<HarnessConfig> {
    match path {
        Some(p) => load_config(p),
        None => Ok(HarnessConfig::default()),
    }
}
