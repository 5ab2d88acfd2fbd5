//! Renderers turning a [`SuiteDescriptor`] into test-suite source text.

pub mod json;
pub mod kotlin;
pub mod rust;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::is_identifier;
use crate::suite::{is_safe_suite_name, SuiteDescriptor};

pub use json::JsonRenderer;
pub use kotlin::KotlinRenderer;
pub use rust::RustRenderer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("`{name}` is not a valid {target} identifier")]
    InvalidIdentifier { name: String, target: &'static str },
    #[error("Suite name `{0}` may only contain letters, digits, spaces, `_`, `-` and `.`")]
    InvalidSuiteName(String),
    #[error("Failed to serialize suite descriptor: {0}")]
    Serialize(String),
}

/// Wiring for the generated sources: where the comparison procedure lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Rust path to a `fn() -> impl Comparator` in the generated test crate.
    pub comparator_path: String,
    /// Kotlin package declared at the top of the generated class.
    pub kotlin_package: Option<String>,
    /// Kotlin object exposing `testFunction(name, numTests)`.
    pub kotlin_comparator: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            comparator_path: "crate::comparator".to_string(),
            kotlin_package: None,
            kotlin_comparator: "DifferentialTestGenerator".to_string(),
        }
    }
}

/// Trait implemented by suite renderers (Rust, Kotlin, JSON).
pub trait SuiteRenderer: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn file_extension(&self) -> &'static str;
    fn render(&self, suite: &SuiteDescriptor) -> Result<String, RenderError>;
}

/// Registry for renderers; callers select by name.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Box<dyn SuiteRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self { renderers: HashMap::new() }
    }

    pub fn register<R: SuiteRenderer + 'static>(&mut self, renderer: R) -> &mut Self {
        self.renderers.insert(renderer.name().to_string(), Box::new(renderer));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn SuiteRenderer> {
        self.renderers.get(name).map(|r| &**r)
    }

    /// Return a sorted list of registered renderer names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.renderers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Registry populated with every built-in renderer.
pub fn default_renderer_registry(options: &RenderOptions) -> RendererRegistry {
    let mut registry = RendererRegistry::new();
    registry
        .register(RustRenderer::new(options.comparator_path.clone()))
        .register(KotlinRenderer::new(
            options.kotlin_package.clone(),
            options.kotlin_comparator.clone(),
        ))
        .register(JsonRenderer);
    registry
}

/// Reject names that cannot become part of a generated identifier.
pub(crate) fn check_identifiers(
    suite: &SuiteDescriptor,
    target: &'static str,
) -> Result<(), RenderError> {
    let mut names = suite.tests().map(|t| &t.function_name).chain(suite.aggregate.functions.iter());
    match names.find(|name| !is_identifier(name)) {
        Some(name) => Err(RenderError::InvalidIdentifier { name: name.clone(), target }),
        None => Ok(()),
    }
}

/// Reject suite names that would break out of a generated comment or string literal.
pub(crate) fn check_suite_name(name: &str) -> Result<(), RenderError> {
    if is_safe_suite_name(name) {
        Ok(())
    } else {
        Err(RenderError::InvalidSuiteName(name.to_string()))
    }
}

/// Suite name reduced to identifier characters, for class names and file stems.
pub fn sanitize_suite_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect();
    if cleaned.is_empty() {
        "Functions".to_string()
    } else if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}
