// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use jar2bundle::{BundleConverter, StagingRoot};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Input, output and staging directories under one temp dir.
///
/// Keep the struct alive for the duration of the test; dropping it removes
/// everything.
pub struct Workspace {
    pub temp_dir: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
    pub staging: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        let staging = temp_dir.path().join("staging");
        fs::create_dir_all(&input).unwrap();
        fs::create_dir_all(&output).unwrap();
        Self {
            temp_dir,
            input,
            output,
            staging,
        }
    }

    /// Converter that stages under this workspace
    pub fn converter(&self) -> BundleConverter {
        BundleConverter::new(StagingRoot::new(&self.staging))
    }

    /// Write a JAR named `name` into the input directory
    pub fn jar(&self, name: &str, entries: &[&str]) -> PathBuf {
        let path = self.input.join(name);
        write_jar(&path, entries);
        path
    }

    /// Names currently present in the staging root
    pub fn staging_entries(&self) -> Vec<String> {
        if !self.staging.exists() {
            return Vec::new();
        }
        fs::read_dir(&self.staging)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    pub fn output_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.output)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Write a ZIP archive with the given entries.
///
/// Names ending in `/` become directory entries; everything else gets a few
/// bytes of placeholder content.
pub fn write_jar(path: &Path, entries: &[&str]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for name in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"\xca\xfe\xba\xbe").unwrap();
        }
    }
    writer.finish().unwrap();
}
