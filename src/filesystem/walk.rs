// src/filesystem/walk.rs

//! Depth-first directory traversal
//!
//! One walker serves both staging cleanup and archiving. Deletion needs
//! children visited before their parent (post-order); archiving needs a
//! directory entry emitted before its contents (pre-order). Siblings are
//! visited in file-name order so repeated walks of the same tree agree.

use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Order in which a directory is visited relative to its contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOrder {
    /// Directory first, then its children
    PreOrder,
    /// Children first, then the directory
    PostOrder,
}

/// Walk `root` depth-first, calling `visit` for every entry including `root`
/// itself (at depth 0).
///
/// Symlinks are reported as entries but never followed. The first error from
/// either the traversal or the visitor stops the walk.
pub fn walk_tree<F>(root: &Path, order: WalkOrder, mut visit: F) -> Result<()>
where
    F: FnMut(&DirEntry) -> Result<()>,
{
    let walker = WalkDir::new(root)
        .follow_links(false)
        .contents_first(order == WalkOrder::PostOrder)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        visit(&entry)?;
    }

    Ok(())
}

/// Recursively delete `root` and everything under it
///
/// A missing `root` is not an error.
pub fn delete_tree(root: &Path) -> Result<()> {
    if std::fs::symlink_metadata(root).is_err() {
        return Ok(());
    }

    walk_tree(root, WalkOrder::PostOrder, |entry| {
        let path = entry.path();
        let removed = if entry.file_type().is_dir() {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        };
        removed.map_err(|e| Error::io(format!("failed to delete {}", path.display()), e))?;
        debug!("Deleted {}", path.display());
        Ok(())
    })
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err
        .path()
        .unwrap_or(root)
        .display()
        .to_string();
    match err.into_io_error() {
        Some(io) => Error::io(format!("failed to traverse {}", path), io),
        None => Error::io(
            format!("failed to traverse {}", path),
            std::io::Error::other("filesystem loop detected"),
        ),
    }
}
