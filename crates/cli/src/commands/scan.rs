use std::path::Path;

use anyhow::{Context, Result};
use difftest_core::analysis::{analyze, Analysis, PipelineError};
use difftest_core::inventory::InventoryListing;
use difftest_core::model::SourceCorpus;
use log::info;
use serde::Serialize;

use crate::canonicalize_or_current;
use crate::commands::{abbreviate_calls, require_file, resolve_config};

#[derive(Debug, Serialize)]
pub struct ScannedFunction {
    pub name: String,
    pub start_line: usize,
    pub instruction_count: usize,
    pub calls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub corpus: String,
    pub listing: String,
    pub stats: difftest_core::analysis::AnalysisStats,
    pub leaf: Vec<ScannedFunction>,
    pub non_leaf: Vec<ScannedFunction>,
    pub excluded: Vec<difftest_core::analysis::ExcludedCandidate>,
    pub denied: Vec<String>,
}

fn scanned(f: &difftest_core::model::Function) -> ScannedFunction {
    ScannedFunction {
        name: f.name.clone(),
        start_line: f.start_position + 1,
        instruction_count: f.instruction_count,
        calls: f.outgoing_calls.clone(),
    }
}

/// Human-readable analysis report: counts, then leaf and non-leaf tables.
pub fn format_scan_report(analysis: &Analysis, suite_name: &str) -> String {
    let stats = &analysis.stats;
    let heavy = "=".repeat(80);
    let light = "-".repeat(80);
    let mut out = String::new();

    out.push_str(&format!("Total labels: {}\n", stats.labels));
    out.push_str(&format!("Unique call targets: {}\n", stats.call_targets));
    if stats.redefinitions > 0 {
        out.push_str(&format!("Label redefinitions: {}\n", stats.redefinitions));
    }
    out.push('\n');
    out.push_str(&format!("{heavy}\n{suite_name} Function Analysis\n{heavy}\n"));
    out.push_str(&format!("Candidates (labels used as call targets): {}\n", stats.candidates));
    out.push_str(&format!("Total functions (candidates reaching a return): {}\n", stats.resolved));
    out.push_str(&format!("Excluded candidates: {}\n", stats.excluded));
    out.push_str(&format!("Denylisted: {}\n", stats.denied));
    out.push_str(&format!("Testable functions: {}\n", stats.leaf + stats.non_leaf));
    out.push_str(&format!("  Leaf functions (no calls): {}\n", stats.leaf));
    out.push_str(&format!("  Non-leaf functions (make calls): {}\n", stats.non_leaf));
    out.push('\n');

    out.push_str(&format!("{light}\nLEAF FUNCTIONS ({}):\n{light}\n", stats.leaf));
    for f in &analysis.classified.leaf {
        out.push_str(&format!(
            "  {:30} (line {:5}, {:3} LOC)\n",
            f.name,
            f.start_position + 1,
            f.instruction_count
        ));
    }
    out.push('\n');
    out.push_str(&format!("{light}\nNON-LEAF FUNCTIONS ({}):\n{light}\n", stats.non_leaf));
    for f in &analysis.classified.non_leaf {
        out.push_str(&format!(
            "  {:30} (line {:5}, {:3} LOC) -> {}\n",
            f.name,
            f.start_position + 1,
            f.instruction_count,
            abbreviate_calls(&f.outgoing_calls)
        ));
    }
    out
}

/// Scan a corpus, print the analysis report, and persist the inventory listing.
pub fn scan_command(corpus: &str, config: Option<&str>, out: &str, json: bool) -> Result<()> {
    let config = resolve_config(config, None, None)?;
    let corpus_path = canonicalize_or_current(corpus)?;
    require_file(&corpus_path, "Assembly corpus")?;

    let source = SourceCorpus::load(&corpus_path)?;
    let analysis = analyze(&source, &config.analysis_options())
        .with_context(|| format!("Failed to analyze {}", corpus_path.display()))?;

    let listing_path = canonicalize_or_current(out)?;
    let has_functions = !analysis.classified.is_empty();
    if has_functions {
        let listing = InventoryListing::from_classified(&config.suite_name, &analysis.classified);
        write_listing(&listing, &listing_path)?;
        info!("wrote inventory listing to {}", listing_path.display());
    }

    if json {
        let report = ScanReport {
            corpus: corpus_path.display().to_string(),
            listing: listing_path.display().to_string(),
            stats: analysis.stats.clone(),
            leaf: analysis.classified.leaf.iter().map(scanned).collect(),
            non_leaf: analysis.classified.non_leaf.iter().map(scanned).collect(),
            excluded: analysis.excluded.clone(),
            denied: analysis.classified.denied.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_scan_report(&analysis, &config.suite_name));
        if has_functions {
            println!();
            println!("Results saved to {}", listing_path.display());
        }
    }

    if !has_functions {
        return Err(PipelineError::EmptyInventory.into());
    }
    Ok(())
}

fn write_listing(listing: &InventoryListing, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    listing.write(path)
}
