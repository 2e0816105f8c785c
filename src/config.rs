// src/config.rs
//! Converter configuration
//!
//! Settings can come from a TOML file; every field is optional and CLI flags
//! override whatever the file sets.
//!
//! ```toml
//! prefix = "org.example."
//! staging_root = "/var/tmp/jar2bundle"
//! on_existing = "skip"        # or "overwrite"
//! parallel = true
//! compression = "deflated"    # or "stored"
//! ```

use crate::bundle::StagingRoot;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// What to do when the target bundle already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingBundlePolicy {
    /// Leave it alone and report the conversion as skipped
    #[default]
    Skip,
    /// Rebuild and replace it
    Overwrite,
}

/// Compression used for entries of the generated bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

/// Settings shared by every conversion in a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Prepended to the symbolic name and the output file name
    pub prefix: String,
    /// Parent of per-conversion staging directories (system temp if unset)
    pub staging_root: Option<PathBuf>,
    pub on_existing: ExistingBundlePolicy,
    /// Convert a directory's archives concurrently
    pub parallel: bool,
    pub compression: Compression,
}

impl ConverterConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Staging root to use for this configuration
    pub fn staging_root(&self) -> StagingRoot {
        match &self.staging_root {
            Some(path) => StagingRoot::new(path),
            None => StagingRoot::system_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.prefix, "");
        assert_eq!(config.on_existing, ExistingBundlePolicy::Skip);
        assert_eq!(config.compression, Compression::Deflated);
        assert!(!config.parallel);
        assert_eq!(config.staging_root(), StagingRoot::system_default());
    }

    #[test]
    fn test_parse_full() {
        let config = ConverterConfig::from_toml(
            r#"
            prefix = "org.example."
            staging_root = "/var/tmp/stage"
            on_existing = "overwrite"
            parallel = true
            compression = "stored"
            "#,
        )
        .unwrap();

        assert_eq!(config.prefix, "org.example.");
        assert_eq!(config.staging_root, Some(PathBuf::from("/var/tmp/stage")));
        assert_eq!(config.on_existing, ExistingBundlePolicy::Overwrite);
        assert!(config.parallel);
        assert_eq!(config.compression, Compression::Stored);
        assert_eq!(config.staging_root().path(), Path::new("/var/tmp/stage"));
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        assert_eq!(
            ConverterConfig::from_toml("").unwrap(),
            ConverterConfig::default()
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(ConverterConfig::from_toml("prefx = \"typo\"").is_err());
        assert!(ConverterConfig::from_toml("on_existing = \"merge\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jar2bundle.toml");
        std::fs::write(&path, "prefix = \"acme_\"\n").unwrap();

        let config = ConverterConfig::from_file(&path).unwrap();
        assert_eq!(config.prefix, "acme_");

        let err = ConverterConfig::from_file(&temp_dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
