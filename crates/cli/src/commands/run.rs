use std::fs;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use difftest_core::analysis::AnalysisStats;
use difftest_core::layout::OutputLayout;
use difftest_core::model::SourceCorpus;
use difftest_core::pipeline::run_pipeline;
use serde::{Deserialize, Serialize};

use crate::commands::{require_file, resolve_config};
use crate::{canonicalize_or_current, sha256_bytes, sha256_file};

/// Manifest written next to the generated artifacts.
///
/// The only output carrying timestamps; the listing and the suite stay
/// byte-identical across runs on an unchanged corpus.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunMetadata {
    pub tool_version: String,
    pub suite_name: String,
    pub corpus_path: String,
    pub corpus_hash: String,
    pub listing_hash: String,
    pub suite_hash: String,
    pub format: String,
    pub trial_count: u32,
    pub stats: AnalysisStats,
    pub started_at: String,
    pub finished_at: String,
}

/// Full pipeline: corpus -> listing + descriptor + rendered suite + manifest.
pub fn run_command(
    corpus: &str,
    config: Option<&str>,
    trials: Option<u32>,
    format: Option<&str>,
    out_dir: &str,
    force: bool,
) -> Result<()> {
    let started_at = Utc::now().to_rfc3339();
    let config = resolve_config(config, trials, format)?;

    let corpus_path = canonicalize_or_current(corpus)?;
    require_file(&corpus_path, "Assembly corpus")?;
    let corpus_hash = sha256_file(&corpus_path)?;
    let source = SourceCorpus::load(&corpus_path)?;

    let output = run_pipeline(&source, &config, &config.format)
        .with_context(|| format!("Failed to process {}", corpus_path.display()))?;

    let layout = OutputLayout::new(canonicalize_or_current(out_dir)?);
    let suite_path = layout.suite_path(&config.suite_name, &output.extension);
    if layout.root.exists() {
        if !force {
            return Err(anyhow!(
                "Output already exists at {} (rerun with --force to overwrite)",
                layout.root.display()
            ));
        }
        // Only this tool's artifacts are replaced; anything else in the root is left alone.
        for artifact in layout.artifact_paths(&suite_path) {
            if artifact == corpus_path {
                return Err(anyhow!(
                    "Refusing to overwrite the corpus {} with a generated artifact",
                    corpus_path.display()
                ));
            }
            if artifact.is_file() {
                fs::remove_file(&artifact).with_context(|| {
                    format!("Failed to remove previous artifact {}", artifact.display())
                })?;
            }
        }
    }
    fs::create_dir_all(&layout.root)
        .with_context(|| format!("Failed to create output dir {}", layout.root.display()))?;

    let listing_text = output.listing.render();
    fs::write(&layout.listing_path, &listing_text).with_context(|| {
        format!("Failed to write inventory listing at {}", layout.listing_path.display())
    })?;

    let descriptor = serde_json::to_string_pretty(&output.suite)
        .context("Failed to serialize suite descriptor")?;
    fs::write(&layout.descriptor_path, format!("{descriptor}\n")).with_context(|| {
        format!("Failed to write suite descriptor at {}", layout.descriptor_path.display())
    })?;

    fs::write(&suite_path, &output.rendered)
        .with_context(|| format!("Failed to write suite at {}", suite_path.display()))?;

    let metadata = RunMetadata {
        tool_version: difftest_core::version().to_string(),
        suite_name: config.suite_name.clone(),
        corpus_path: corpus_path.display().to_string(),
        corpus_hash,
        listing_hash: sha256_bytes(listing_text.as_bytes()),
        suite_hash: sha256_bytes(output.rendered.as_bytes()),
        format: output.format.clone(),
        trial_count: config.trial_count,
        stats: output.analysis.stats.clone(),
        started_at,
        finished_at: Utc::now().to_rfc3339(),
    };
    fs::write(&layout.metadata_path, serde_json::to_string_pretty(&metadata)?).with_context(
        || format!("Failed to write run metadata at {}", layout.metadata_path.display()),
    )?;

    let stats = &output.analysis.stats;
    println!("Generated differential suite:");
    println!("  Suite: {}", config.suite_name);
    println!("  Corpus: {}", corpus_path.display());
    println!(
        "  Labels: {}  Call targets: {}  Resolved: {}  Excluded: {}",
        stats.labels, stats.call_targets, stats.resolved, stats.excluded
    );
    println!("  Functions: {} leaf + {} non-leaf", stats.leaf, stats.non_leaf);
    println!("  Listing: {}", layout.listing_path.display());
    println!("  Descriptor: {}", layout.descriptor_path.display());
    println!("  Suite ({}): {}", output.format, suite_path.display());
    println!("  Metadata: {}", layout.metadata_path.display());

    Ok(())
}
