//! Leaf / non-leaf partition with an explicit denylist.

use std::collections::BTreeSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::model::{Function, FunctionInventory};

/// Routines that must never get a test unit (e.g. table-driven dispatchers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denylist(BTreeSet<String>);

impl Default for Denylist {
    fn default() -> Self {
        Self::new(["JumpEngine"])
    }
}

impl Denylist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Classifier output. Both vectors are ordered by name and disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedInventory {
    pub leaf: Vec<Function>,
    pub non_leaf: Vec<Function>,
    /// Denylisted names that were present in the inventory.
    pub denied: Vec<String>,
}

impl ClassifiedInventory {
    pub fn leaf_names(&self) -> Vec<String> {
        self.leaf.iter().map(|f| f.name.clone()).collect()
    }

    pub fn non_leaf_names(&self) -> Vec<String> {
        self.non_leaf.iter().map(|f| f.name.clone()).collect()
    }

    /// Testable function count (leaf + non-leaf).
    pub fn len(&self) -> usize {
        self.leaf.len() + self.non_leaf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn classify(inventory: &FunctionInventory, denylist: &Denylist) -> ClassifiedInventory {
    let mut classified = ClassifiedInventory::default();

    for function in inventory.iter() {
        if denylist.contains(&function.name) {
            classified.denied.push(function.name.clone());
            continue;
        }
        if function.is_leaf() {
            classified.leaf.push(function.clone());
        } else {
            classified.non_leaf.push(function.clone());
        }
    }

    for name in denylist.names() {
        if !inventory.contains(name) {
            warn!("denylisted routine `{}` was not found in the inventory", name);
        }
    }

    classified
}
