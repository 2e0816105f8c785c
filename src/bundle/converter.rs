// src/bundle/converter.rs
//! Single JAR to bundle conversion
//!
//! Validates inputs, derives the target path, then runs
//! scan → manifest → stage → archive → release. Nothing is written until
//! validation has passed, and a failed conversion leaves neither a staging
//! directory nor a partial bundle behind.

use crate::bundle::archiver::Archiver;
use crate::bundle::manifest::ManifestBuilder;
use crate::bundle::scanner::PackageScanner;
use crate::bundle::staging::{StagingArea, StagingRoot};
use crate::bundle::{bundle_file_name, has_archive_extension, source_file_name, ARCHIVE_EXTENSION};
use crate::config::{ConverterConfig, ExistingBundlePolicy};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Successful result of one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// A new bundle was written
    Created {
        bundle: PathBuf,
        packages: Vec<String>,
    },
    /// The bundle already existed and was left untouched
    Skipped { bundle: PathBuf },
}

impl ConversionOutcome {
    /// Path of the target bundle
    pub fn bundle(&self) -> &Path {
        match self {
            Self::Created { bundle, .. } | Self::Skipped { bundle } => bundle,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Converts one JAR into an OSGi bundle
#[derive(Debug, Clone)]
pub struct BundleConverter {
    manifest_builder: ManifestBuilder,
    archiver: Archiver,
    staging_root: StagingRoot,
    on_existing: ExistingBundlePolicy,
}

impl BundleConverter {
    /// Converter with an explicit staging root and default settings
    pub fn new(staging_root: StagingRoot) -> Self {
        Self {
            manifest_builder: ManifestBuilder::new(),
            archiver: Archiver::new(),
            staging_root,
            on_existing: ExistingBundlePolicy::Skip,
        }
    }

    /// Converter configured from `config`
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self {
            manifest_builder: ManifestBuilder::new().with_prefix(config.prefix.clone()),
            archiver: Archiver::new().with_compression(config.compression),
            staging_root: config.staging_root(),
            on_existing: config.on_existing,
        }
    }

    /// Set the symbolic-name and file-name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.manifest_builder = self.manifest_builder.with_prefix(prefix);
        self
    }

    /// Choose what happens when the target bundle already exists
    pub fn with_existing_policy(mut self, policy: ExistingBundlePolicy) -> Self {
        self.on_existing = policy;
        self
    }

    pub fn prefix(&self) -> &str {
        self.manifest_builder.prefix()
    }

    pub fn staging_root(&self) -> &StagingRoot {
        &self.staging_root
    }

    /// Path the bundle for `source` would be written to
    pub fn target_path(&self, source: &Path, destination_dir: &Path) -> Result<PathBuf> {
        let file_name = source_file_name(source)?;
        Ok(destination_dir.join(bundle_file_name(file_name, self.prefix())?))
    }

    /// Convert `source` into a bundle inside `destination_dir`
    pub fn convert(&self, source: &Path, destination_dir: &Path) -> Result<ConversionOutcome> {
        validate(source, destination_dir)?;
        let target = self.target_path(source, destination_dir)?;

        if target.exists() {
            match self.on_existing {
                ExistingBundlePolicy::Skip => {
                    info!(
                        "Bundle {} already exists, skipping {}",
                        target.display(),
                        source.display()
                    );
                    return Ok(ConversionOutcome::Skipped { bundle: target });
                }
                ExistingBundlePolicy::Overwrite => {
                    debug!("Overwriting existing bundle {}", target.display());
                }
            }
        }

        info!("Creating OSGi bundle for {}", source.display());
        let packages = match self.build(source, &target) {
            Ok(packages) => packages,
            // another conversion claimed the same target after the check above
            Err(e) if e.is_already_exists() && self.on_existing == ExistingBundlePolicy::Skip => {
                info!(
                    "Bundle {} was created concurrently, skipping {}",
                    target.display(),
                    source.display()
                );
                return Ok(ConversionOutcome::Skipped { bundle: target });
            }
            Err(e) => return Err(e),
        };
        info!(
            "Created bundle {} ({} exported packages)",
            target.display(),
            packages.len()
        );
        Ok(ConversionOutcome::Created {
            bundle: target,
            packages,
        })
    }

    fn build(&self, source: &Path, target: &Path) -> Result<Vec<String>> {
        let file_name = source_file_name(source)?;

        let packages = PackageScanner::scan(source)?;
        let manifest = self.manifest_builder.build(file_name, &packages)?;

        let staging = self.staging_root.acquire(source, &manifest)?;
        debug!(
            "Staged {} in {}",
            file_name,
            staging.path().display()
        );

        self.pack(staging, target)?;
        Ok(packages)
    }

    /// Archive a staged tree into `target` and release the staging area
    ///
    /// Any failure removes `target`, except a create-new collision, where the
    /// file belongs to someone else. Staging is released on every path.
    fn pack(&self, staging: StagingArea, target: &Path) -> Result<()> {
        let archived = match self.on_existing {
            ExistingBundlePolicy::Skip => self.archiver.archive_new(staging.path(), target),
            ExistingBundlePolicy::Overwrite => self.archiver.archive(staging.path(), target),
        };

        // Returning early drops `staging`, which releases it
        let summary = match archived {
            Ok(summary) => summary,
            Err(e) => {
                if !e.is_already_exists() {
                    remove_partial(target);
                }
                return Err(e);
            }
        };
        debug!("Archived {} entries into {}", summary.entries(), target.display());

        if let Err(e) = staging.release() {
            remove_partial(target);
            return Err(e);
        }
        Ok(())
    }
}

impl Default for BundleConverter {
    fn default() -> Self {
        Self::new(StagingRoot::system_default())
    }
}

/// Input checks that run before any file is read or written
fn validate(source: &Path, destination_dir: &Path) -> Result<()> {
    if !destination_dir.is_dir() {
        return Err(Error::validation(format!(
            "destination {} is not a directory",
            destination_dir.display()
        )));
    }
    if !source.exists() {
        return Err(Error::validation(format!(
            "source {} does not exist",
            source.display()
        )));
    }
    if source.is_dir() {
        return Err(Error::validation(format!(
            "source {} is a directory",
            source.display()
        )));
    }
    if same_directory(source.parent(), destination_dir) {
        return Err(Error::validation(format!(
            "source {} is already inside destination {}",
            source.display(),
            destination_dir.display()
        )));
    }
    if !has_archive_extension(source) {
        return Err(Error::validation(format!(
            "source {} is not a {} file",
            source.display(),
            ARCHIVE_EXTENSION
        )));
    }
    Ok(())
}

/// True if `parent` and `dir` resolve to the same directory
///
/// A bundle written next to its source would be picked up again by the next
/// directory run and wrapped a second time.
fn same_directory(parent: Option<&Path>, dir: &Path) -> bool {
    let parent = match parent {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => return false,
    };
    match (parent.canonicalize(), dir.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn remove_partial(target: &Path) {
    if !target.exists() {
        return;
    }
    match std::fs::remove_file(target) {
        Ok(()) => debug!("Removed partial bundle {}", target.display()),
        Err(e) => warn!("Failed to remove partial bundle {}: {}", target.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::manifest::{BundleManifest, EXPORT_PACKAGE, MANIFEST_PATH};
    use std::fs::{self, File};
    use std::io::{Read, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::{ZipArchive, ZipWriter};

    struct Fixture {
        temp_dir: TempDir,
        input: PathBuf,
        output: PathBuf,
        converter: BundleConverter,
    }

    impl Fixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let input = temp_dir.path().join("in");
            let output = temp_dir.path().join("out");
            fs::create_dir_all(&input).unwrap();
            fs::create_dir_all(&output).unwrap();
            let converter = BundleConverter::new(StagingRoot::new(temp_dir.path().join("staging")));
            Self {
                temp_dir,
                input,
                output,
                converter,
            }
        }

        fn jar(&self, name: &str, classes: &[&str]) -> PathBuf {
            let path = self.input.join(name);
            let mut writer = ZipWriter::new(File::create(&path).unwrap());
            for class in classes {
                writer.start_file(*class, SimpleFileOptions::default()).unwrap();
                writer.write_all(b"\xca\xfe\xba\xbe").unwrap();
            }
            writer.finish().unwrap();
            path
        }

        fn staging_is_empty(&self) -> bool {
            let root = self.temp_dir.path().join("staging");
            !root.exists() || fs::read_dir(root).unwrap().next().is_none()
        }
    }

    #[test]
    fn test_convert_creates_bundle() {
        let fx = Fixture::new();
        let source = fx.jar("sample-utils.jar", &["x/y/A.class", "x/z/B.class"]);

        let outcome = fx.converter.convert(&source, &fx.output).unwrap();

        let expected = fx.output.join("sample_utils_1.0.0.jar");
        assert_eq!(outcome.bundle(), expected);
        assert!(!outcome.is_skipped());
        assert!(expected.exists());
        assert!(fx.staging_is_empty());

        let mut zip = ZipArchive::new(File::open(&expected).unwrap()).unwrap();
        let mut text = String::new();
        zip.by_name(MANIFEST_PATH)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        let manifest = BundleManifest::parse(&text).unwrap();
        assert_eq!(manifest.get(EXPORT_PACKAGE), Some("x.y,x.z"));
        assert!(zip.by_name("sample-utils.jar").is_ok());
    }

    #[test]
    fn test_prefix_changes_file_name() {
        let fx = Fixture::new();
        let source = fx.jar("lib.jar", &["a/A.class"]);
        let converter = fx.converter.clone().with_prefix("org.acme.");

        let outcome = converter.convert(&source, &fx.output).unwrap();
        assert_eq!(outcome.bundle(), fx.output.join("org.acme.lib_1.0.0.jar"));
    }

    #[test]
    fn test_second_convert_skips() {
        let fx = Fixture::new();
        let source = fx.jar("lib.jar", &["a/A.class"]);

        fx.converter.convert(&source, &fx.output).unwrap();
        let bundle = fx.output.join("lib_1.0.0.jar");
        let before = fs::read(&bundle).unwrap();

        let outcome = fx.converter.convert(&source, &fx.output).unwrap();
        assert_eq!(outcome, ConversionOutcome::Skipped { bundle: bundle.clone() });
        assert_eq!(fs::read(&bundle).unwrap(), before);
    }

    #[test]
    fn test_overwrite_policy_rebuilds() {
        let fx = Fixture::new();
        let source = fx.jar("lib.jar", &["a/A.class"]);
        let bundle = fx.output.join("lib_1.0.0.jar");
        fs::write(&bundle, b"stale").unwrap();

        let outcome = fx
            .converter
            .clone()
            .with_existing_policy(ExistingBundlePolicy::Overwrite)
            .convert(&source, &fx.output)
            .unwrap();

        assert!(!outcome.is_skipped());
        assert_ne!(fs::read(&bundle).unwrap(), b"stale");
    }

    #[test]
    fn test_destination_not_directory() {
        let fx = Fixture::new();
        let source = fx.jar("lib.jar", &["a/A.class"]);
        let not_dir = fx.temp_dir.path().join("file-dest");
        fs::write(&not_dir, b"").unwrap();

        let err = fx.converter.convert(&source, &not_dir).unwrap_err();
        assert!(err.is_validation());
        assert!(!fx.temp_dir.path().join("staging").exists());
    }

    #[test]
    fn test_source_validation() {
        let fx = Fixture::new();
        let text = fx.input.join("readme.txt");
        fs::write(&text, b"hi").unwrap();

        for source in [fx.input.join("missing.jar"), text, fx.input.clone()] {
            let err = fx.converter.convert(&source, &fx.output).unwrap_err();
            assert!(err.is_validation(), "{}", source.display());
        }
        assert!(fs::read_dir(&fx.output).unwrap().next().is_none());
    }

    #[test]
    fn test_corrupt_jar_cleans_up() {
        let fx = Fixture::new();
        let source = fx.input.join("broken.jar");
        fs::write(&source, b"not a zip").unwrap();

        let err = fx.converter.convert(&source, &fx.output).unwrap_err();

        assert!(!err.is_validation());
        assert!(!fx.output.join("broken_1.0.0.jar").exists());
        assert!(fx.staging_is_empty());
    }

    #[test]
    fn test_source_inside_destination_rejected() {
        let fx = Fixture::new();
        let source = fx.jar("lib.jar", &["a/A.class"]);

        let err = fx.converter.convert(&source, &fx.input).unwrap_err();

        assert!(err.is_validation());
        assert!(!fx.input.join("lib_1.0.0.jar").exists());
        assert!(!fx.temp_dir.path().join("staging").exists());
    }

    fn staged(fx: &Fixture, source: &Path) -> StagingArea {
        let manifest = ManifestBuilder::new()
            .build("lib.jar", &["a".to_string()])
            .unwrap();
        fx.converter.staging_root().acquire(source, &manifest).unwrap()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failure_while_archiving_removes_target_and_staging() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let fx = Fixture::new();
        let source = fx.jar("lib.jar", &["a/A.class"]);
        let staging = staged(&fx, &source);
        // sorts after META-INF and lib.jar, so packing fails part-way through
        fs::write(staging.path().join(OsStr::from_bytes(b"z\xff.bin")), b"x").unwrap();
        let target = fx.output.join("lib_1.0.0.jar");

        let err = fx.converter.pack(staging, &target).unwrap_err();

        assert!(err.is_validation());
        assert!(!target.exists());
        assert!(fx.staging_is_empty());
    }

    #[test]
    fn test_target_claimed_during_conversion_is_left_alone() {
        let fx = Fixture::new();
        let source = fx.jar("lib.jar", &["a/A.class"]);
        let staging = staged(&fx, &source);
        let target = fx.output.join("lib_1.0.0.jar");
        fs::write(&target, b"written by another conversion").unwrap();

        let err = fx.converter.pack(staging, &target).unwrap_err();

        assert!(err.is_already_exists());
        assert_eq!(fs::read(&target).unwrap(), b"written by another conversion");
        assert!(fx.staging_is_empty());
    }

    #[test]
    fn test_target_path_is_deterministic() {
        let fx = Fixture::new();
        let a = fx
            .converter
            .target_path(Path::new("/x/my-lib.jar"), &fx.output)
            .unwrap();
        let b = fx
            .converter
            .target_path(Path::new("/y/my-lib.jar"), &fx.output)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a, fx.output.join("my_lib_1.0.0.jar"));
    }
}
