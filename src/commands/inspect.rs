// src/commands/inspect.rs

//! The `inspect` command

use anyhow::{Context, Result};
use jar2bundle::InspectedBundle;
use std::path::Path;

/// Print the manifest and entry list of a bundle
pub fn cmd_inspect(bundle: &Path) -> Result<()> {
    if !bundle.exists() {
        anyhow::bail!("Bundle not found: {}", bundle.display());
    }

    let inspected = InspectedBundle::from_file(bundle).context("Failed to read bundle")?;

    println!("Bundle: {}", inspected.path.display());
    println!();
    println!("Manifest:");
    for (name, value) in inspected.manifest.iter() {
        println!("  {}: {}", name, value);
    }

    let exported = inspected.manifest.exported_packages();
    if !exported.is_empty() {
        println!();
        println!("Exported packages ({}):", exported.len());
        for package in exported {
            println!("  {}", package);
        }
    }

    println!();
    println!("Entries ({}):", inspected.entries.len());
    for entry in &inspected.entries {
        println!("  {}", entry);
    }

    Ok(())
}
