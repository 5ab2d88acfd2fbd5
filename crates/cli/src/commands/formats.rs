use anyhow::Result;
use serde::Serialize;

use difftest_core::suite::render::{default_renderer_registry, RenderOptions};

#[derive(Debug, Serialize)]
pub struct FormatInfo {
    pub name: String,
    pub extension: String,
    pub description: String,
}

/// List suite renderers known to this binary.
pub fn list_formats_command(json: bool) -> Result<()> {
    let registry = default_renderer_registry(&RenderOptions::default());
    let entries: Vec<FormatInfo> = registry
        .names()
        .into_iter()
        .filter_map(|name| {
            registry.get(&name).map(|r| FormatInfo {
                name: name.clone(),
                extension: r.file_extension().to_string(),
                description: r.description().to_string(),
            })
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Formats: (none)");
        return Ok(());
    }

    println!("Formats:");
    for entry in entries {
        println!("- {} (.{}): {}", entry.name, entry.extension, entry.description);
    }

    Ok(())
}
