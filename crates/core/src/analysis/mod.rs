//! Function inventory recovery from a flat assembly listing.
//!
//! Three pure stages, each testable on its own:
//! - `scanner`: label definitions and call targets (one pass).
//! - `resolver`: boundary walk per candidate label.
//! - `classifier`: leaf / non-leaf partition minus the denylist.
//!
//! [`analyze`] chains them and collects the counts a user needs to judge
//! recovery quality.

pub mod classifier;
pub mod resolver;
pub mod scanner;
pub mod syntax;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{FunctionInventory, SourceCorpus};

pub use classifier::{classify, ClassifiedInventory, Denylist};
pub use resolver::{resolve, ExcludedCandidate, ExclusionReason, Resolution};
pub use scanner::{scan, Redefinition, RedefinitionPolicy, ScanResult};
pub use syntax::{is_identifier, AsmSyntax, LineKind, LineMatcher};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Assembly corpus is empty")]
    EmptyCorpus,
    #[error("No testable functions were recovered from the corpus")]
    EmptyInventory,
    #[error("Invalid assembly syntax configuration: {0}")]
    InvalidSyntax(String),
}

/// Knobs for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub syntax: AsmSyntax,
    pub denylist: Denylist,
    pub redefinition: RedefinitionPolicy,
}

/// Counts reported after analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub lines: usize,
    pub labels: usize,
    pub call_targets: usize,
    pub redefinitions: usize,
    pub candidates: usize,
    pub resolved: usize,
    pub excluded: usize,
    pub denied: usize,
    pub leaf: usize,
    pub non_leaf: usize,
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub scan: ScanResult,
    pub inventory: FunctionInventory,
    pub excluded: Vec<ExcludedCandidate>,
    pub classified: ClassifiedInventory,
    pub stats: AnalysisStats,
}

/// Run scan -> resolve -> classify over a corpus.
///
/// Fails only on an empty corpus or an unusable syntax configuration. An empty
/// inventory is reported through `stats`; callers decide whether that is fatal.
pub fn analyze(corpus: &SourceCorpus, options: &AnalysisOptions) -> Result<Analysis, PipelineError> {
    if corpus.is_empty() || corpus.is_blank() {
        return Err(PipelineError::EmptyCorpus);
    }
    let matcher = LineMatcher::new(&options.syntax)?;

    let scan_result = scan(corpus, &matcher, options.redefinition);
    let resolution = resolve(corpus, &scan_result, &matcher);
    let classified = classify(&resolution.inventory, &options.denylist);

    let stats = AnalysisStats {
        lines: corpus.len(),
        labels: scan_result.labels.len(),
        call_targets: scan_result.call_targets.len(),
        redefinitions: scan_result.redefinitions.len(),
        candidates: resolution.candidate_count,
        resolved: resolution.inventory.len(),
        excluded: resolution.excluded.len(),
        denied: classified.denied.len(),
        leaf: classified.leaf.len(),
        non_leaf: classified.non_leaf.len(),
    };

    info!(
        "scanned {} lines: {} labels, {} call targets, {} candidates",
        stats.lines, stats.labels, stats.call_targets, stats.candidates
    );
    if stats.excluded > 0 {
        warn!("{} candidate(s) excluded from the inventory", stats.excluded);
    }
    info!(
        "resolved {} functions ({} leaf, {} non-leaf, {} denylisted)",
        stats.resolved, stats.leaf, stats.non_leaf, stats.denied
    );

    Ok(Analysis {
        scan: scan_result,
        inventory: resolution.inventory,
        excluded: resolution.excluded,
        classified,
        stats,
    })
}
