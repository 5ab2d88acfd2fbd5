//! Core data model for assembly corpora, functions, and call edges.
//!
//! Every type here is built once per run and never mutated afterwards. Stages
//! borrow the previous stage's output and produce a new owned value.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A single line of assembly text with its 0-based ordinal position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

/// The full, ordered line sequence of a disassembly listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCorpus {
    lines: Vec<SourceLine>,
}

impl SourceCorpus {
    /// Split `text` into numbered lines. Handles both `\n` and `\r\n` endings.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(number, text)| SourceLine { number, text: text.to_string() })
            .collect();
        Self { lines }
    }

    /// Read a corpus from disk in full.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read assembly corpus at {}", path.display()))?;
        Ok(Self::from_text(&text))
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when every line is blank.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.text.trim().is_empty())
    }
}

/// A name bound to a source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub position: usize,
}

/// Directed call relation recorded while resolving the caller's body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: String,
    pub callee: String,
}

/// A well-formed function recovered from the corpus.
///
/// Only candidates whose body reaches a return instruction are ever turned
/// into a `Function`; malformed candidates are reported separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub start_position: usize,
    pub end_position: usize,
    pub instruction_count: usize,
    /// Callee names in source order; duplicates are kept.
    pub outgoing_calls: Vec<String>,
}

impl Function {
    pub fn is_leaf(&self) -> bool {
        self.outgoing_calls.is_empty()
    }

    /// Always true: construction requires a reached return instruction.
    pub fn well_formed(&self) -> bool {
        true
    }

    pub fn call_edges(&self) -> impl Iterator<Item = CallEdge> + '_ {
        self.outgoing_calls
            .iter()
            .map(move |callee| CallEdge { caller: self.name.clone(), callee: callee.clone() })
    }
}

/// Complete name -> function mapping produced by boundary resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInventory {
    functions: BTreeMap<String, Function>,
}

impl FunctionInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function, keyed by name. A later insert with the same name replaces the earlier one.
    pub fn insert(&mut self, function: Function) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Functions in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }

    pub fn leaf_set(&self) -> Vec<&Function> {
        self.iter().filter(|f| f.is_leaf()).collect()
    }

    pub fn non_leaf_set(&self) -> Vec<&Function> {
        self.iter().filter(|f| !f.is_leaf()).collect()
    }

    pub fn call_edges(&self) -> Vec<CallEdge> {
        self.iter().flat_map(|f| f.call_edges()).collect()
    }
}

impl FromIterator<Function> for FunctionInventory {
    fn from_iter<I: IntoIterator<Item = Function>>(iter: I) -> Self {
        let mut inventory = FunctionInventory::new();
        for function in iter {
            inventory.insert(function);
        }
        inventory
    }
}
