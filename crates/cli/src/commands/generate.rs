use std::fs;

use anyhow::{anyhow, Context, Result};
use difftest_core::inventory::InventoryListing;
use difftest_core::layout::suite_file_stem;
use difftest_core::pipeline::render_suite;
use difftest_core::suite::generate_from_listing;

use crate::canonicalize_or_current;
use crate::commands::{require_file, resolve_config};

/// Generate a suite source from a persisted inventory listing.
pub fn generate_command(
    inventory: &str,
    config: Option<&str>,
    trials: Option<u32>,
    format: Option<&str>,
    out: Option<&str>,
) -> Result<()> {
    let mut config = resolve_config(config, trials, format)?;
    let listing_path = canonicalize_or_current(inventory)?;
    require_file(&listing_path, "Inventory listing")?;

    let listing = InventoryListing::read(&listing_path)?;
    if listing.is_empty() {
        return Err(anyhow!("Inventory listing {} has no functions", listing_path.display()));
    }
    // Listing title applies only when the config left the suite name at its default.
    if !listing.title.is_empty() && config.suite_name == "Functions" {
        config.suite_name = listing.title.clone();
    }

    let suite = generate_from_listing(&listing, &config.suite_options());
    let (rendered, extension) = render_suite(&suite, &config.format, &config)?;

    let out_path = match out {
        Some(path) => canonicalize_or_current(path)?,
        None => canonicalize_or_current(&format!(
            "{}.{}",
            suite_file_stem(&config.suite_name),
            extension
        ))?,
    };
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&out_path, &rendered)
        .with_context(|| format!("Failed to write suite to {}", out_path.display()))?;

    println!("Generated {}", out_path.display());
    println!("  Format: {}", config.format);
    println!(
        "  Functions: {} ({} leaf + {} non-leaf)",
        suite.test_count(),
        suite.leaf.len(),
        suite.non_leaf.len()
    );
    println!("  Test units: {} (+1 summary)", suite.test_count());
    println!("  Trials per function: {}", suite.trial_count);
    println!("  Lines: {}", rendered.lines().count());

    Ok(())
}
