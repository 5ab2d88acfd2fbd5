//! Persisted function inventory listing (`functions.txt`).
//!
//! This is the hand-off between analysis and suite generation:
//!
//! ```text
//! # Functions
//!
//! ## Leaf Functions (2)
//! ClearBuffer
//! ResetTimer
//!
//! ## Non-Leaf Functions (1)
//! GameLoop -> ClearBuffer,ResetTimer,ClearBuffer
//! ```
//!
//! Rendering is deterministic and [`parse_listing`] reproduces the leaf set,
//! the non-leaf set, and every non-leaf call order.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{is_identifier, ClassifiedInventory};

const LEAF_HEADER: &str = "## Leaf Functions";
const NON_LEAF_HEADER: &str = "## Non-Leaf Functions";
const CALL_SEPARATOR: &str = " -> ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("line {line}: entry `{entry}` appears before any section header")]
    EntryOutsideSection { line: usize, entry: String },
    #[error("line {line}: section `{section}` declared twice")]
    DuplicateSection { line: usize, section: String },
    #[error("line {line}: malformed section header `{header}`")]
    MalformedHeader { line: usize, header: String },
    #[error("line {line}: `{name}` is not a valid function name")]
    InvalidName { line: usize, name: String },
    #[error("line {line}: leaf entry `{name}` must not list calls")]
    LeafWithCalls { line: usize, name: String },
    #[error("line {line}: non-leaf entry `{entry}` must be `Name -> Callee[,Callee...]`")]
    MalformedNonLeaf { line: usize, entry: String },
    #[error("line {line}: function `{name}` listed more than once")]
    DuplicateName { line: usize, name: String },
    #[error("section `{section}` declares {declared} entries but lists {found}")]
    CountMismatch { section: String, declared: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonLeafEntry {
    pub name: String,
    pub calls: Vec<String>,
}

/// In-memory form of the listing artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryListing {
    pub title: String,
    pub leaf: Vec<String>,
    pub non_leaf: Vec<NonLeafEntry>,
}

impl InventoryListing {
    pub fn from_classified(title: impl Into<String>, classified: &ClassifiedInventory) -> Self {
        Self {
            title: title.into(),
            leaf: classified.leaf_names(),
            non_leaf: classified
                .non_leaf
                .iter()
                .map(|f| NonLeafEntry { name: f.name.clone(), calls: f.outgoing_calls.clone() })
                .collect(),
        }
    }

    pub fn leaf_names(&self) -> Vec<String> {
        self.leaf.clone()
    }

    pub fn non_leaf_names(&self) -> Vec<String> {
        self.non_leaf.iter().map(|e| e.name.clone()).collect()
    }

    pub fn calls_of(&self, name: &str) -> Option<&[String]> {
        self.non_leaf.iter().find(|e| e.name == name).map(|e| e.calls.as_slice())
    }

    pub fn len(&self) -> usize {
        self.leaf.len() + self.non_leaf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the listing text. Entries keep their stored order.
    ///
    /// An empty title and the title `Functions` both render as `# Functions`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.title.is_empty() || self.title == "Functions" {
            out.push_str("# Functions\n\n");
        } else {
            out.push_str(&format!("# {} Functions\n\n", self.title));
        }

        out.push_str(&format!("{} ({})\n", LEAF_HEADER, self.leaf.len()));
        for name in &self.leaf {
            out.push_str(name);
            out.push('\n');
        }

        out.push_str(&format!("\n{} ({})\n", NON_LEAF_HEADER, self.non_leaf.len()));
        for entry in &self.non_leaf {
            out.push_str(&format!("{}{}{}\n", entry.name, CALL_SEPARATOR, entry.calls.join(",")));
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())
            .with_context(|| format!("Failed to write inventory listing at {}", path.display()))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read inventory listing at {}", path.display()))?;
        parse_listing(&text)
            .with_context(|| format!("Failed to parse inventory listing at {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Leaf,
    NonLeaf,
}

impl Section {
    fn header(&self) -> &'static str {
        match self {
            Section::Leaf => LEAF_HEADER,
            Section::NonLeaf => NON_LEAF_HEADER,
        }
    }
}

/// Parse `## <Section> Functions (N)`; the count is optional.
fn parse_header(line_no: usize, line: &str) -> Result<Option<(Section, Option<usize>)>, ListingError> {
    let (section, rest) = if let Some(rest) = line.strip_prefix(NON_LEAF_HEADER) {
        (Section::NonLeaf, rest)
    } else if let Some(rest) = line.strip_prefix(LEAF_HEADER) {
        (Section::Leaf, rest)
    } else {
        return Ok(None);
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(Some((section, None)));
    }
    let count = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .and_then(|n| n.trim().parse::<usize>().ok())
        .ok_or_else(|| ListingError::MalformedHeader { line: line_no, header: line.to_string() })?;
    Ok(Some((section, Some(count))))
}

fn check_name(line_no: usize, name: &str) -> Result<(), ListingError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ListingError::InvalidName { line: line_no, name: name.to_string() })
    }
}

/// Parse listing text back into an [`InventoryListing`].
pub fn parse_listing(text: &str) -> Result<InventoryListing, ListingError> {
    let mut listing = InventoryListing::default();
    let mut section: Option<Section> = None;
    let mut declared: Vec<(Section, usize)> = Vec::new();
    let mut seen_sections: BTreeSet<&'static str> = BTreeSet::new();
    let mut seen_names: BTreeSet<String> = BTreeSet::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((next, count)) = parse_header(line_no, line)? {
            if !seen_sections.insert(next.header()) {
                return Err(ListingError::DuplicateSection {
                    line: line_no,
                    section: next.header().trim_start_matches("## ").to_string(),
                });
            }
            if let Some(count) = count {
                declared.push((next, count));
            }
            section = Some(next);
            continue;
        }

        if line.starts_with('#') {
            if section.is_none() && listing.title.is_empty() {
                if let Some(title) = line.strip_prefix("# ") {
                    let title = title.trim();
                    listing.title = title.strip_suffix("Functions").unwrap_or(title).trim().to_string();
                }
            }
            continue;
        }

        match section {
            None => {
                return Err(ListingError::EntryOutsideSection {
                    line: line_no,
                    entry: line.to_string(),
                })
            }
            Some(Section::Leaf) => {
                if line.contains("->") {
                    let name = line.split("->").next().unwrap_or_default().trim().to_string();
                    return Err(ListingError::LeafWithCalls { line: line_no, name });
                }
                check_name(line_no, line)?;
                if !seen_names.insert(line.to_string()) {
                    return Err(ListingError::DuplicateName { line: line_no, name: line.to_string() });
                }
                listing.leaf.push(line.to_string());
            }
            Some(Section::NonLeaf) => {
                let entry = parse_non_leaf(line_no, line)?;
                if !seen_names.insert(entry.name.clone()) {
                    return Err(ListingError::DuplicateName { line: line_no, name: entry.name });
                }
                listing.non_leaf.push(entry);
            }
        }
    }

    for (section, count) in declared {
        let found = match section {
            Section::Leaf => listing.leaf.len(),
            Section::NonLeaf => listing.non_leaf.len(),
        };
        if found != count {
            return Err(ListingError::CountMismatch {
                section: section.header().trim_start_matches("## ").to_string(),
                declared: count,
                found,
            });
        }
    }

    Ok(listing)
}

fn parse_non_leaf(line_no: usize, line: &str) -> Result<NonLeafEntry, ListingError> {
    let malformed = || ListingError::MalformedNonLeaf { line: line_no, entry: line.to_string() };

    let (name, calls) = line.split_once("->").ok_or_else(malformed)?;
    let name = name.trim();
    check_name(line_no, name)?;

    let calls: Vec<String> = calls
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if calls.is_empty() {
        return Err(malformed());
    }
    for call in &calls {
        check_name(line_no, call)?;
    }

    Ok(NonLeafEntry { name: name.to_string(), calls })
}
