use anyhow::{anyhow, Result};

use crate::analysis::{analyze, Analysis, PipelineError};
use crate::config::HarnessConfig;
use crate::inventory::InventoryListing;
use crate::model::SourceCorpus;
use crate::suite::render::{default_renderer_registry, SuiteRenderer};
use crate::suite::{generate_from_listing, SuiteDescriptor};

/// Everything one batch run produces, before anything is written to disk.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub analysis: Analysis,
    pub listing: InventoryListing,
    pub suite: SuiteDescriptor,
    pub rendered: String,
    pub format: String,
    pub extension: String,
}

/// Render a suite with the named renderer from the default registry.
pub fn render_suite(
    suite: &SuiteDescriptor,
    format: &str,
    config: &HarnessConfig,
) -> Result<(String, &'static str)> {
    let registry = default_renderer_registry(&config.render);
    let renderer: &dyn SuiteRenderer = registry.get(format).ok_or_else(|| {
        anyhow!("Unknown suite format '{}'. Available: {}", format, registry.names().join(", "))
    })?;
    let rendered = renderer.render(suite)?;
    Ok((rendered, renderer.file_extension()))
}

/// Corpus -> analysis -> listing -> suite -> rendered source.
///
/// The suite is generated from the parsed-back listing so a run from the
/// corpus and a run from a persisted listing go through the same hand-off.
pub fn run_pipeline(
    corpus: &SourceCorpus,
    config: &HarnessConfig,
    format: &str,
) -> Result<PipelineOutput> {
    let analysis = analyze(corpus, &config.analysis_options())?;
    if analysis.classified.is_empty() {
        return Err(PipelineError::EmptyInventory.into());
    }

    let listing = InventoryListing::from_classified(&config.suite_name, &analysis.classified);
    let reparsed = crate::inventory::parse_listing(&listing.render())?;
    let suite = generate_from_listing(&reparsed, &config.suite_options());
    let (rendered, extension) = render_suite(&suite, format, config)?;

    Ok(PipelineOutput {
        analysis,
        listing,
        suite,
        rendered,
        format: format.to_string(),
        extension: extension.to_string(),
    })
}
