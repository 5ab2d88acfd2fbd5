//! Second pass: walk each candidate's body to decide whether it is a function.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::scanner::ScanResult;
use crate::analysis::syntax::{LineKind, LineMatcher};
use crate::model::{Function, FunctionInventory, Label, SourceCorpus};

/// Why a candidate label did not become a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Another label began before any return instruction.
    FellThrough { next_label: String, position: usize },
    /// The corpus ended before any return instruction.
    Unterminated,
    /// The name was defined more than once and the policy drops it.
    Redefined,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::FellThrough { next_label, position } => {
                write!(f, "reached label `{}` at line {} before a return", next_label, position + 1)
            }
            ExclusionReason::Unterminated => write!(f, "end of corpus before a return"),
            ExclusionReason::Redefined => write!(f, "label defined more than once"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedCandidate {
    pub name: String,
    pub start_position: usize,
    pub reason: ExclusionReason,
}

/// Inventory plus the candidates that were dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub inventory: FunctionInventory,
    pub excluded: Vec<ExcludedCandidate>,
    pub candidate_count: usize,
}

/// Resolve every candidate (label that is also a call target).
///
/// Never fails: ambiguous bodies are excluded rather than guessed at.
pub fn resolve(corpus: &SourceCorpus, scan: &ScanResult, matcher: &LineMatcher) -> Resolution {
    let mut resolution = Resolution::default();

    for label in scan.excluded_candidates() {
        resolution.candidate_count += 1;
        record_exclusion(&mut resolution, &label, ExclusionReason::Redefined);
    }

    for label in scan.candidates() {
        resolution.candidate_count += 1;
        match resolve_candidate(corpus, &label, matcher) {
            Ok(function) => resolution.inventory.insert(function),
            Err(reason) => record_exclusion(&mut resolution, &label, reason),
        }
    }

    resolution
}

fn record_exclusion(resolution: &mut Resolution, label: &Label, reason: ExclusionReason) {
    debug!("excluding `{}` (line {}): {}", label.name, label.position + 1, reason);
    resolution.excluded.push(ExcludedCandidate {
        name: label.name.clone(),
        start_position: label.position,
        reason,
    });
}

/// Walk forward from the line after `label` until a return, a label, or the end.
pub fn resolve_candidate(
    corpus: &SourceCorpus,
    label: &Label,
    matcher: &LineMatcher,
) -> Result<Function, ExclusionReason> {
    let mut instruction_count = 0;
    let mut outgoing_calls = Vec::new();

    for line in corpus.lines().iter().skip(label.position + 1) {
        match matcher.classify(&line.text) {
            LineKind::Blank | LineKind::Comment | LineKind::Other => {}
            LineKind::Label(next) => {
                return Err(ExclusionReason::FellThrough {
                    next_label: next.to_string(),
                    position: line.number,
                });
            }
            LineKind::Return => {
                return Ok(Function {
                    name: label.name.clone(),
                    start_position: label.position,
                    end_position: line.number,
                    instruction_count,
                    outgoing_calls,
                });
            }
            LineKind::Instruction { mnemonic } => {
                instruction_count += 1;
                if matcher.is_call_mnemonic(mnemonic) {
                    outgoing_calls
                        .extend(matcher.call_targets(&line.text).into_iter().map(str::to_string));
                }
            }
        }
    }

    Err(ExclusionReason::Unterminated)
}
