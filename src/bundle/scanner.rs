// src/bundle/scanner.rs
//! Java package discovery
//!
//! Packages are derived purely from class-file entry paths; nothing is
//! decompressed or parsed. `org/example/util/Strings.class` contributes
//! `org.example.util`.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

const CLASS_SUFFIX: &str = ".class";

/// Derives the list of Java packages contained in an archive
pub struct PackageScanner;

impl PackageScanner {
    /// Scan an archive and return its packages in first-seen entry order
    ///
    /// Directory entries, non-class entries and root-level classes (no
    /// package) are ignored. Each package appears once.
    pub fn scan(archive_path: &Path) -> Result<Vec<String>> {
        let metadata =
            std::fs::metadata(archive_path).map_err(|e| metadata_error(archive_path, e))?;
        if metadata.is_dir() {
            return Err(Error::validation(format!(
                "{} is a directory, not an archive",
                archive_path.display()
            )));
        }

        let file = File::open(archive_path)
            .map_err(|e| Error::io(format!("failed to open {}", archive_path.display()), e))?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| Error::from_zip(archive_path, e))?;

        let mut names = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|e| Error::from_zip(archive_path, e))?;
            names.push(entry.name().to_string());
        }

        let packages = Self::packages_from_entries(names.iter().map(String::as_str));
        debug!(
            "Found {} packages in {} ({} entries)",
            packages.len(),
            archive_path.display(),
            names.len()
        );
        Ok(packages)
    }

    /// Derive packages from a sequence of archive entry names
    pub fn packages_from_entries<'a, I>(entries: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut packages = Vec::new();

        for name in entries {
            if let Some(package) = package_of(name) {
                if seen.insert(package.clone()) {
                    packages.push(package);
                }
            }
        }

        packages
    }
}

/// Only a missing archive is bad input; anything else is an I/O failure
fn metadata_error(archive_path: &Path, err: std::io::Error) -> Error {
    if err.kind() == ErrorKind::NotFound {
        Error::validation(format!("{} does not exist", archive_path.display()))
    } else {
        Error::io(format!("failed to stat {}", archive_path.display()), err)
    }
}

/// Package of a single entry, if it is a class inside a package
fn package_of(entry_name: &str) -> Option<String> {
    if entry_name.ends_with('/') || !entry_name.ends_with(CLASS_SUFFIX) {
        return None;
    }
    let separator = entry_name.rfind('/')?;
    let package = &entry_name[..separator];
    if package.is_empty() {
        return None;
    }
    Some(package.replace('/', "."))
}
