use crate::suite::render::{RenderError, SuiteRenderer};
use crate::suite::SuiteDescriptor;

/// Serializes the descriptor itself, for tooling that drives its own runner.
pub struct JsonRenderer;

impl SuiteRenderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "Suite descriptor as pretty-printed JSON"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, suite: &SuiteDescriptor) -> Result<String, RenderError> {
        let mut body =
            serde_json::to_string_pretty(suite).map_err(|e| RenderError::Serialize(e.to_string()))?;
        body.push('\n');
        Ok(body)
    }
}
