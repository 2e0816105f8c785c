// src/commands/packages.rs

//! The `packages` command

use anyhow::{Context, Result};
use jar2bundle::PackageScanner;
use std::path::Path;

/// List the packages `jar` would export, in first-seen order
pub fn cmd_packages(jar: &Path) -> Result<()> {
    let packages = PackageScanner::scan(jar)
        .with_context(|| format!("Failed to scan {}", jar.display()))?;

    if packages.is_empty() {
        println!("No packages found in {}", jar.display());
        return Ok(());
    }

    for package in &packages {
        println!("{}", package);
    }
    Ok(())
}
