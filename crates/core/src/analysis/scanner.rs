//! First pass: label definitions and call targets.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::syntax::LineMatcher;
use crate::model::{Label, SourceCorpus};

/// What to do when a label name is defined more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedefinitionPolicy {
    /// Keep the first definition; later ones are reported.
    #[default]
    FirstWins,
    /// Keep the last definition; earlier ones are reported.
    LastWins,
    /// Drop the name from function candidacy entirely.
    Exclude,
}

impl RedefinitionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedefinitionPolicy::FirstWins => "first-wins",
            RedefinitionPolicy::LastWins => "last-wins",
            RedefinitionPolicy::Exclude => "exclude",
        }
    }
}

/// A label defined again after its first definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redefinition {
    pub name: String,
    pub first_position: usize,
    pub position: usize,
}

/// Output of the label/edge scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Label name -> defining position, per the redefinition policy.
    pub labels: BTreeMap<String, usize>,
    /// Every name used as a call operand anywhere in the corpus.
    pub call_targets: BTreeSet<String>,
    pub redefinitions: Vec<Redefinition>,
    /// Names dropped under [`RedefinitionPolicy::Exclude`].
    pub excluded_names: BTreeSet<String>,
}

impl ScanResult {
    pub fn label(&self, name: &str) -> Option<Label> {
        self.labels.get(name).map(|&position| Label { name: name.to_string(), position })
    }

    /// Labels that are also call targets, in name order.
    pub fn candidates(&self) -> Vec<Label> {
        self.labels
            .iter()
            .filter(|(name, _)| self.call_targets.contains(*name))
            .map(|(name, &position)| Label { name: name.clone(), position })
            .collect()
    }

    /// Call targets dropped under [`RedefinitionPolicy::Exclude`], at their first position.
    pub fn excluded_candidates(&self) -> Vec<Label> {
        self.excluded_names
            .iter()
            .filter(|name| self.call_targets.contains(*name))
            .filter_map(|name| {
                self.redefinitions
                    .iter()
                    .find(|r| &r.name == name)
                    .map(|r| Label { name: name.clone(), position: r.first_position })
            })
            .collect()
    }
}

/// Scan every line once, recording label definitions and call operands.
pub fn scan(corpus: &SourceCorpus, matcher: &LineMatcher, policy: RedefinitionPolicy) -> ScanResult {
    let mut result = ScanResult::default();
    let mut first_seen: BTreeMap<String, usize> = BTreeMap::new();

    for line in corpus.lines() {
        if let Some(name) = matcher.label_at_line_start(&line.text) {
            match first_seen.get(name) {
                None => {
                    first_seen.insert(name.to_string(), line.number);
                    result.labels.insert(name.to_string(), line.number);
                }
                Some(&first_position) => {
                    warn!(
                        "label `{}` redefined at line {} (first defined at line {}); applying {}",
                        name,
                        line.number + 1,
                        first_position + 1,
                        policy.as_str()
                    );
                    result.redefinitions.push(Redefinition {
                        name: name.to_string(),
                        first_position,
                        position: line.number,
                    });
                    match policy {
                        RedefinitionPolicy::FirstWins => {}
                        RedefinitionPolicy::LastWins => {
                            result.labels.insert(name.to_string(), line.number);
                        }
                        RedefinitionPolicy::Exclude => {
                            result.excluded_names.insert(name.to_string());
                        }
                    }
                }
            }
        }

        for target in matcher.call_targets(&line.text) {
            result.call_targets.insert(target.to_string());
        }
    }

    for name in &result.excluded_names {
        result.labels.remove(name);
    }

    result
}
