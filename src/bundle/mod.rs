// src/bundle/mod.rs
//! JAR to OSGi bundle conversion
//!
//! A plain JAR becomes a bundle by wrapping it, untouched, inside a new
//! archive that also carries an OSGi manifest and a p2 activation descriptor:
//!
//! ```text
//! <prefix><name>_1.0.0.jar
//! ├── META-INF/
//! │   ├── MANIFEST.MF     Bundle-SymbolicName, Export-Package, ...
//! │   └── p2.inf          instructions.configure=markStarted(started:true);
//! └── <original>.jar      referenced from Bundle-ClassPath
//! ```
//!
//! The pipeline for one archive is scan → manifest → stage → archive →
//! release, driven by [`BundleConverter`]. [`BatchRunner`] applies it to a
//! single file or to every `.jar` directly inside a directory.

mod archiver;
mod batch;
mod converter;
pub mod inspect;
pub mod manifest;
mod scanner;
mod staging;

pub use archiver::{ArchiveSummary, Archiver, BUFFER_SIZE};
pub use batch::{BatchItem, BatchReport, BatchRunner, list_archives};
pub use converter::{BundleConverter, ConversionOutcome};
pub use inspect::InspectedBundle;
pub use manifest::{BundleManifest, ManifestBuilder};
pub use scanner::PackageScanner;
pub use staging::{P2_INF_CONTENT, StagingArea, StagingRoot};

use crate::error::{Error, Result};
use std::path::Path;

/// File extension recognized as a convertible archive
pub const ARCHIVE_EXTENSION: &str = ".jar";

/// Version stamped on every generated bundle
pub const BUNDLE_VERSION: &str = "1.0.0";

/// Returns true if the file name ends in the archive extension
pub fn has_archive_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(ARCHIVE_EXTENSION))
}

/// The source file name as a string, or a validation error
pub fn source_file_name(source: &Path) -> Result<&str> {
    let name = source.file_name().ok_or_else(|| {
        Error::validation(format!("{} has no file name", source.display()))
    })?;
    name.to_str().ok_or_else(|| {
        Error::validation(format!("{} is not a valid UTF-8 file name", source.display()))
    })
}

/// Bundle-Name for a source file: extension stripped, `-` replaced by `_`
///
/// `sample-utils.jar` becomes `sample_utils`.
pub fn bundle_name(file_name: &str) -> Result<String> {
    let stem = file_name.strip_suffix(ARCHIVE_EXTENSION).ok_or_else(|| {
        Error::validation(format!("{} is not a {} file", file_name, ARCHIVE_EXTENSION))
    })?;
    if stem.is_empty() {
        return Err(Error::validation(format!(
            "{} has no name before the extension",
            file_name
        )));
    }
    Ok(stem.replace('-', "_"))
}

/// Output file name: `<prefix><bundle name>_1.0.0.jar`
///
/// Depends only on the source file name and the prefix, never on archive
/// content.
pub fn bundle_file_name(file_name: &str, prefix: &str) -> Result<String> {
    Ok(format!(
        "{}{}_{}{}",
        prefix,
        bundle_name(file_name)?,
        BUNDLE_VERSION,
        ARCHIVE_EXTENSION
    ))
}
