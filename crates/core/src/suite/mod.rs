//! Test-suite descriptors synthesized from a classified inventory.
//!
//! The generator only describes what must be executed; running the
//! comparisons is the job of [`crate::harness`] and whatever `Comparator`
//! the rendered suite is wired to.

pub mod render;

use serde::{Deserialize, Serialize};

use crate::inventory::InventoryListing;

/// Trials per function when nothing else is configured.
pub const DEFAULT_TRIAL_COUNT: u32 = 10;

/// Differences printed per failing trial in a per-function report.
pub const DEFAULT_MAX_REPORTED_DIFFERENCES: usize = 5;

/// True when `name` is non-blank and uses only ASCII letters, digits, spaces, `_`, `-` and `.`.
///
/// Suite names are embedded in generated comments and string literals.
pub fn is_safe_suite_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionGroup {
    Leaf,
    NonLeaf,
}

/// One test unit: compare `function_name` over `trial_count` random states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDescriptor {
    pub function_name: String,
    pub trial_count: u32,
    pub group: FunctionGroup,
    pub max_reported_differences: usize,
}

/// The unit that runs every function and reports pass/partial/fail buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateDescriptor {
    /// Leaf names followed by non-leaf names.
    pub functions: Vec<String>,
    pub trial_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteDescriptor {
    pub suite_name: String,
    pub trial_count: u32,
    pub leaf: Vec<TestDescriptor>,
    pub non_leaf: Vec<TestDescriptor>,
    pub aggregate: AggregateDescriptor,
}

impl SuiteDescriptor {
    /// Per-function descriptors, leaf group first.
    pub fn tests(&self) -> impl Iterator<Item = &TestDescriptor> {
        self.leaf.iter().chain(self.non_leaf.iter())
    }

    pub fn test_count(&self) -> usize {
        self.leaf.len() + self.non_leaf.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteOptions {
    pub suite_name: String,
    pub trial_count: u32,
    pub max_reported_differences: usize,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            suite_name: "Functions".to_string(),
            trial_count: DEFAULT_TRIAL_COUNT,
            max_reported_differences: DEFAULT_MAX_REPORTED_DIFFERENCES,
        }
    }
}

/// Build a suite from ordered leaf and non-leaf name lists.
pub fn generate(leaf: &[String], non_leaf: &[String], options: &SuiteOptions) -> SuiteDescriptor {
    let describe = |name: &String, group| TestDescriptor {
        function_name: name.clone(),
        trial_count: options.trial_count,
        group,
        max_reported_differences: options.max_reported_differences,
    };

    let leaf_tests: Vec<TestDescriptor> =
        leaf.iter().map(|n| describe(n, FunctionGroup::Leaf)).collect();
    let non_leaf_tests: Vec<TestDescriptor> =
        non_leaf.iter().map(|n| describe(n, FunctionGroup::NonLeaf)).collect();

    let functions = leaf.iter().chain(non_leaf.iter()).cloned().collect();

    SuiteDescriptor {
        suite_name: options.suite_name.clone(),
        trial_count: options.trial_count,
        leaf: leaf_tests,
        non_leaf: non_leaf_tests,
        aggregate: AggregateDescriptor { functions, trial_count: options.trial_count },
    }
}

/// Convenience wrapper over [`generate`] for a parsed listing.
pub fn generate_from_listing(listing: &InventoryListing, options: &SuiteOptions) -> SuiteDescriptor {
    generate(&listing.leaf_names(), &listing.non_leaf_names(), options)
}
