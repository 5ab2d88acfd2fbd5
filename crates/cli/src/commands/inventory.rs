use anyhow::Result;
use difftest_core::inventory::InventoryListing;

use crate::canonicalize_or_current;
use crate::commands::{abbreviate_calls, require_file};

/// Print a persisted inventory listing.
pub fn show_inventory_command(inventory: &str, json: bool) -> Result<()> {
    let path = canonicalize_or_current(inventory)?;
    require_file(&path, "Inventory listing")?;
    let listing = InventoryListing::read(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let title = if listing.title.is_empty() { "Functions" } else { listing.title.as_str() };
    println!("Inventory: {} ({} functions)", title, listing.len());
    println!("Leaf ({}):", listing.leaf.len());
    if listing.leaf.is_empty() {
        println!("  (none)");
    }
    for name in &listing.leaf {
        println!("  - {}", name);
    }
    println!("Non-leaf ({}):", listing.non_leaf.len());
    if listing.non_leaf.is_empty() {
        println!("  (none)");
    }
    for entry in &listing.non_leaf {
        println!("  - {} -> {}", entry.name, abbreviate_calls(&entry.calls));
    }

    Ok(())
}
