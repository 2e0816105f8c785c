// src/bundle/inspect.rs
//! Read back a generated bundle: its entry list and parsed manifest

use crate::bundle::manifest::{BundleManifest, MANIFEST_PATH};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Contents of an existing bundle archive
#[derive(Debug, Clone)]
pub struct InspectedBundle {
    pub path: PathBuf,
    /// Entry names in central-directory order
    pub entries: Vec<String>,
    pub manifest: BundleManifest,
}

impl InspectedBundle {
    /// Open `path` and read its entries and `META-INF/MANIFEST.MF`
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::validation(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let file = File::open(path)
            .map_err(|e| Error::io(format!("failed to open {}", path.display()), e))?;
        let mut zip = ZipArchive::new(file).map_err(|e| Error::from_zip(path, e))?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let entry = zip.by_index_raw(i).map_err(|e| Error::from_zip(path, e))?;
            entries.push(entry.name().to_string());
        }

        let mut text = String::new();
        {
            let mut entry = zip.by_name(MANIFEST_PATH).map_err(|e| match e {
                zip::result::ZipError::FileNotFound => Error::Format {
                    path: path.to_path_buf(),
                    reason: format!("missing {}", MANIFEST_PATH),
                },
                other => Error::from_zip(path, other),
            })?;
            entry.read_to_string(&mut text).map_err(|e| {
                Error::io(format!("failed to read {} in {}", MANIFEST_PATH, path.display()), e)
            })?;
        }
        let manifest = BundleManifest::parse(&text)?;

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            manifest,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::manifest::{ManifestBuilder, BUNDLE_SYMBOLIC_NAME};
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn test_inspect_reads_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lib_1.0.0.jar");
        let manifest = ManifestBuilder::new()
            .build("lib.jar", &["a.b".to_string()])
            .unwrap();

        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        writer
            .add_directory("META-INF/", SimpleFileOptions::default())
            .unwrap();
        writer
            .start_file(MANIFEST_PATH, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(manifest.render().as_bytes()).unwrap();
        writer.start_file("lib.jar", SimpleFileOptions::default()).unwrap();
        writer.write_all(b"inner").unwrap();
        writer.finish().unwrap();

        let inspected = InspectedBundle::from_file(&path).unwrap();
        assert_eq!(inspected.entries, vec!["META-INF/", MANIFEST_PATH, "lib.jar"]);
        assert!(inspected.contains("lib.jar"));
        assert_eq!(inspected.manifest, manifest);
        assert_eq!(inspected.manifest.get(BUNDLE_SYMBOLIC_NAME), Some("lib"));
    }

    #[test]
    fn test_missing_manifest_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.jar");
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        writer.start_file("a/A.class", SimpleFileOptions::default()).unwrap();
        writer.finish().unwrap();

        let err = InspectedBundle::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
        assert!(err.to_string().contains(MANIFEST_PATH));
    }

    #[test]
    fn test_missing_file_is_validation_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = InspectedBundle::from_file(&temp_dir.path().join("nope.jar")).unwrap_err();
        assert!(err.is_validation());
    }
}
