use std::path::Path;

use anyhow::{anyhow, Result};
use difftest_core::config::{load_config_or_default, HarnessConfig};

use crate::canonicalize_or_current;

/// Load the config file (if any) and apply CLI overrides.
///
/// Precedence: CLI flag > config file > built-in default.
pub fn resolve_config(
    config_path: Option<&str>,
    trials: Option<u32>,
    format: Option<&str>,
) -> Result<HarnessConfig> {
    let path = config_path.map(canonicalize_or_current).transpose()?;
    let mut config = load_config_or_default(path.as_deref())?;
    if let Some(trials) = trials {
        if trials == 0 {
            return Err(anyhow!("--trials must be at least 1"));
        }
        config.trial_count = trials;
    }
    if let Some(format) = format {
        config.format = format.to_string();
    }
    Ok(config)
}

/// Fail early with a readable message when an input file is missing.
pub fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.is_file() {
        return Err(anyhow!("{} does not exist: {}", what, path.display()));
    }
    Ok(())
}

/// Abbreviate a call list to its first three entries.
pub fn abbreviate_calls(calls: &[String]) -> String {
    let mut shown = calls.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
    if calls.len() > 3 {
        shown.push_str(&format!(" ... +{} more", calls.len() - 3));
    }
    shown
}
