// src/lib.rs

//! jar2bundle: wrap plain JAR archives as OSGi bundles
//!
//! A bundle produced here carries the original JAR untouched, an OSGi
//! manifest exporting every package that contains a class, and a p2
//! descriptor that marks the bundle as started.
//!
//! # Architecture
//!
//! - Scan: package names come from `.class` entry paths, nothing is loaded
//! - Stage: each conversion works in its own uniquely named directory
//! - Archive: the staged tree is packed with `/`-separated entry names
//! - Release: staging directories are removed on success, failure or panic
//!
//! ```no_run
//! use jar2bundle::{BatchRunner, ConverterConfig};
//! use std::path::Path;
//!
//! let runner = BatchRunner::from_config(&ConverterConfig::default());
//! let report = runner.run(Path::new("lib/"), Path::new("plugins/"));
//! println!("{} created, {} failed", report.created(), report.failed());
//! ```

pub mod bundle;
pub mod config;
mod error;
pub mod filesystem;
pub mod progress;

pub use bundle::{
    BatchItem, BatchReport, BatchRunner, BundleConverter, BundleManifest, ConversionOutcome,
    InspectedBundle, ManifestBuilder, PackageScanner, StagingArea, StagingRoot,
};
pub use config::{Compression, ConverterConfig, ExistingBundlePolicy};
pub use error::{Error, ErrorCategory, Result};
pub use progress::{CliProgress, LogProgress, ProgressTracker, SilentProgress};
