// src/commands/convert.rs

//! The `convert` command: one JAR or a directory of JARs into bundles

use anyhow::{Context, Result};
use jar2bundle::bundle::{ARCHIVE_EXTENSION, list_archives};
use jar2bundle::{
    BatchReport, BatchRunner, CliProgress, ConversionOutcome, ConverterConfig,
    ExistingBundlePolicy, LogProgress, ProgressTracker,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::info;

/// Flags of the `convert` command
#[derive(Debug, Default)]
pub struct ConvertOptions {
    pub prefix: Option<String>,
    pub overwrite: bool,
    pub parallel: bool,
    pub staging_root: Option<PathBuf>,
    pub purge_staging: bool,
    pub config: Option<PathBuf>,
}

impl ConvertOptions {
    /// Load the configuration file, if any, and apply the flags over it
    fn resolve(&self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ConverterConfig::default(),
        };

        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if self.overwrite {
            config.on_existing = ExistingBundlePolicy::Overwrite;
        }
        if self.parallel {
            config.parallel = true;
        }
        if let Some(root) = &self.staging_root {
            config.staging_root = Some(root.clone());
        }
        Ok(config)
    }
}

/// Convert `source` into bundles inside `destination`
pub fn cmd_convert(source: &Path, destination: &Path, options: &ConvertOptions) -> Result<()> {
    let config = options.resolve()?;

    if options.purge_staging {
        let staging_root = config.staging_root();
        info!("Purging staging root {}", staging_root.path().display());
        staging_root
            .purge()
            .context("Failed to purge staging root")?;
    }

    let runner = BatchRunner::from_config(&config);
    let report = if source.is_dir() {
        // listing errors surface as a failed item from the runner
        let count = list_archives(source)
            .map(|archives| archives.len())
            .unwrap_or(0);
        if count == 0 {
            println!("No {} files found in {}", ARCHIVE_EXTENSION, source.display());
        }
        let progress = batch_progress(count as u64);
        runner.run_with_progress(source, destination, progress.as_ref())
    } else {
        runner.run(source, destination)
    };

    print_report(&report);

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} conversions failed",
            report.failed(),
            report.len()
        );
    }
    Ok(())
}

/// A progress bar on a terminal, periodic log lines otherwise
fn batch_progress(length: u64) -> Box<dyn ProgressTracker> {
    if std::io::stderr().is_terminal() {
        Box::new(CliProgress::new("Converting", length))
    } else {
        Box::new(LogProgress::new("Converting", length))
    }
}

fn print_report(report: &BatchReport) {
    for item in report.items() {
        match &item.result {
            Ok(ConversionOutcome::Created { bundle, packages }) => println!(
                "  [OK] {} -> {} ({} packages)",
                item.source.display(),
                bundle.display(),
                packages.len()
            ),
            Ok(ConversionOutcome::Skipped { bundle }) => println!(
                "  [SKIPPED] {} already exists",
                bundle.display()
            ),
            Err(e) => println!("  [FAILED] {}: {}", item.source.display(), e),
        }
    }

    if report.len() > 1 {
        println!();
        println!(
            "{} created, {} skipped, {} failed",
            report.created(),
            report.skipped(),
            report.failed()
        );
    }
}
