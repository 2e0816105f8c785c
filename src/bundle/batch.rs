// src/bundle/batch.rs
//! Batch conversion over a file or a directory of JARs
//!
//! A directory is not searched recursively: only `.jar` files directly inside
//! it are converted. Each archive is converted independently and a failure is
//! recorded without stopping the rest of the batch.

use crate::bundle::converter::{BundleConverter, ConversionOutcome};
use crate::bundle::has_archive_extension;
use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::progress::{ProgressTracker, SilentProgress};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result for one input archive
#[derive(Debug)]
pub struct BatchItem {
    pub source: PathBuf,
    pub result: Result<ConversionOutcome>,
}

/// Results of a batch run, one per input, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<BatchItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of bundles written
    pub fn created(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.result, Ok(ConversionOutcome::Created { .. })))
            .count()
    }

    /// Number of inputs whose bundle already existed
    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.result, Ok(ConversionOutcome::Skipped { .. })))
            .count()
    }

    /// Number of inputs that failed
    pub fn failed(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_err()).count()
    }

    /// True if no input failed
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Applies a [`BundleConverter`] to one archive or a directory of archives
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    converter: BundleConverter,
    parallel: bool,
}

impl BatchRunner {
    pub fn new(converter: BundleConverter) -> Self {
        Self {
            converter,
            parallel: false,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(BundleConverter::from_config(config)).with_parallel(config.parallel)
    }

    /// Convert a directory's archives concurrently
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn converter(&self) -> &BundleConverter {
        &self.converter
    }

    /// Convert `source` (an archive or a directory of archives) into
    /// `destination_dir`
    pub fn run(&self, source: &Path, destination_dir: &Path) -> BatchReport {
        self.run_with_progress(source, destination_dir, &SilentProgress::new())
    }

    /// Like [`run`](Self::run), reporting one increment per archive
    pub fn run_with_progress(
        &self,
        source: &Path,
        destination_dir: &Path,
        progress: &dyn ProgressTracker,
    ) -> BatchReport {
        let sources = if source.is_dir() {
            match list_archives(source) {
                Ok(sources) => sources,
                Err(e) => {
                    warn!("Cannot list {}: {}", source.display(), e);
                    return BatchReport {
                        items: vec![BatchItem {
                            source: source.to_path_buf(),
                            result: Err(e),
                        }],
                    };
                }
            }
        } else {
            vec![source.to_path_buf()]
        };
        debug!("Converting {} archive(s) into {}", sources.len(), destination_dir.display());

        let convert_one = |path: &PathBuf| {
            progress.set_message(&path.display().to_string());
            let result = self.converter.convert(path, destination_dir);
            if let Err(e) = &result {
                warn!("Failed to convert {}: {}", path.display(), e);
            }
            progress.increment(1);
            BatchItem {
                source: path.clone(),
                result,
            }
        };

        let items: Vec<BatchItem> = if self.parallel {
            sources.par_iter().map(convert_one).collect()
        } else {
            sources.iter().map(convert_one).collect()
        };

        let report = BatchReport { items };
        progress.finish_with_message(&format!(
            "{} created, {} skipped, {} failed",
            report.created(),
            report.skipped(),
            report.failed()
        ));
        report
    }
}

/// `.jar` entries directly inside `dir`, sorted by path
pub fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| Error::io(format!("failed to list {}", dir.display()), e))?;

    let mut archives = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(format!("failed to list {}", dir.display()), e))?;
        let path = entry.path();
        if has_archive_extension(&path) {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}
