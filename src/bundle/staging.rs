// src/bundle/staging.rs
//! Scoped staging directories for bundle assembly
//!
//! Every conversion gets its own directory under a [`StagingRoot`], named
//! from a timestamp plus a random suffix and created with `create_dir` so two
//! conversions can never share one. The directory is owned by a
//! [`StagingArea`] value: `release()` deletes it and reports failures, and
//! dropping an unreleased area deletes it best-effort.
//!
//! The root is never swept implicitly. [`StagingRoot::purge`] exists for
//! callers that want leftovers from crashed runs removed, and must only be
//! called before any conversion using that root starts.

use crate::bundle::manifest::{BundleManifest, MANIFEST_PATH};
use crate::bundle::source_file_name;
use crate::error::{Error, Result};
use crate::filesystem::walk::delete_tree;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// p2 provisioning instruction: start the bundle once installed
pub const P2_INF_CONTENT: &str = "instructions.configure=markStarted(started:true);";

/// Location of the p2 descriptor inside a bundle
pub const P2_INF_PATH: &str = "META-INF/p2.inf";

/// Directory name used under the system temp dir by default
const DEFAULT_ROOT_NAME: &str = "jar2bundle-staging";

/// Parent directory for per-conversion staging directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingRoot {
    path: PathBuf,
}

impl StagingRoot {
    /// Use `path` as the staging root; it is created on first acquire
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<system temp dir>/jar2bundle-staging`
    pub fn system_default() -> Self {
        Self::new(std::env::temp_dir().join(DEFAULT_ROOT_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete everything under the root, leaving the root itself
    pub fn purge(&self) -> Result<()> {
        if !self.path.is_dir() {
            return Ok(());
        }
        let entries = fs::read_dir(&self.path)
            .map_err(|e| Error::io(format!("failed to list {}", self.path.display()), e))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| Error::io(format!("failed to list {}", self.path.display()), e))?;
            delete_tree(&entry.path())?;
        }
        debug!("Purged staging root {}", self.path.display());
        Ok(())
    }

    /// Create a staging directory holding a copy of `source`, the rendered
    /// manifest and the p2 descriptor
    ///
    /// On failure the partially populated directory is removed before the
    /// error is returned.
    pub fn acquire(&self, source: &Path, manifest: &BundleManifest) -> Result<StagingArea> {
        let file_name = source_file_name(source)?;

        fs::create_dir_all(&self.path).map_err(|e| {
            Error::io(
                format!("failed to create staging root {}", self.path.display()),
                e,
            )
        })?;

        let dir = self.path.join(unique_dir_name());
        fs::create_dir(&dir).map_err(|e| {
            Error::io(format!("failed to create staging directory {}", dir.display()), e)
        })?;
        debug!("Acquired staging directory {}", dir.display());

        // From here on, an early return drops the area and removes the directory
        let area = StagingArea {
            bundled_archive: dir.join(file_name),
            path: dir,
            released: false,
        };

        fs::copy(source, &area.bundled_archive).map_err(|e| {
            Error::io(
                format!(
                    "failed to copy {} into {}",
                    source.display(),
                    area.path.display()
                ),
                e,
            )
        })?;

        let manifest_path = area.manifest_path();
        if let Some(meta_inf) = manifest_path.parent() {
            fs::create_dir_all(meta_inf).map_err(|e| {
                Error::io(format!("failed to create {}", meta_inf.display()), e)
            })?;
        }

        fs::write(&manifest_path, manifest.render()).map_err(|e| {
            Error::io(format!("failed to write {}", manifest_path.display()), e)
        })?;

        let p2_inf_path = area.p2_inf_path();
        fs::write(&p2_inf_path, P2_INF_CONTENT).map_err(|e| {
            Error::io(format!("failed to write {}", p2_inf_path.display()), e)
        })?;

        Ok(area)
    }
}

impl Default for StagingRoot {
    fn default() -> Self {
        Self::system_default()
    }
}

/// `<yyyymmddHHMMSSmmm>-<uuid>`
fn unique_dir_name() -> String {
    format!(
        "{}-{}",
        Utc::now().format("%Y%m%d%H%M%S%3f"),
        Uuid::new_v4().simple()
    )
}

/// One conversion's staging directory
///
/// Layout:
/// ```text
/// <staging>/<original>.jar
/// <staging>/META-INF/MANIFEST.MF
/// <staging>/META-INF/p2.inf
/// ```
#[derive(Debug)]
pub struct StagingArea {
    path: PathBuf,
    bundled_archive: PathBuf,
    released: bool,
}

impl StagingArea {
    /// Root of the staged bundle tree
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the source archive inside the staging directory
    pub fn bundled_archive(&self) -> &Path {
        &self.bundled_archive
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_PATH)
    }

    pub fn p2_inf_path(&self) -> PathBuf {
        self.path.join(P2_INF_PATH)
    }

    /// Delete the staging directory and everything in it
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        delete_tree(&self.path)?;
        debug!("Released staging directory {}", self.path.display());
        Ok(())
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = delete_tree(&self.path) {
            warn!(
                "Failed to clean up staging directory {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
