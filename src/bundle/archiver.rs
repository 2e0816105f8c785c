// src/bundle/archiver.rs
//! Directory-to-JAR packing
//!
//! Entry names are relative to the packed directory and always use `/`,
//! whatever the host separator. Directories become name-only entries ending
//! in `/`; files are streamed through a fixed buffer so large JARs are never
//! held in memory.

use crate::config::Compression;
use crate::error::{Error, Result};
use crate::filesystem::walk::{WalkOrder, walk_tree};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Component, Path};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Read buffer used when streaming file content into the archive
pub const BUFFER_SIZE: usize = 40 * 1024;

/// What was written to an archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: usize,
    pub directories: usize,
    /// Uncompressed bytes of file content
    pub bytes: u64,
}

impl ArchiveSummary {
    pub fn entries(&self) -> usize {
        self.files + self.directories
    }
}

/// Packs a directory tree into a ZIP/JAR archive
#[derive(Debug, Clone, Default)]
pub struct Archiver {
    compression: Compression,
}

impl Archiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Archive every file and directory under `source_dir` into
    /// `destination`, which is created or truncated
    ///
    /// The archive is finalized even when adding an entry fails; the first
    /// error is the one returned. Removing a failed output is the caller's
    /// decision.
    pub fn archive(&self, source_dir: &Path, destination: &Path) -> Result<ArchiveSummary> {
        self.archive_into(source_dir, destination, false)
    }

    /// Like [`archive`](Self::archive), but fails with an `AlreadyExists` I/O
    /// error instead of truncating an existing `destination`
    ///
    /// The existence check and the creation are one atomic open, so two
    /// writers racing for the same path cannot both succeed.
    pub fn archive_new(&self, source_dir: &Path, destination: &Path) -> Result<ArchiveSummary> {
        self.archive_into(source_dir, destination, true)
    }

    fn archive_into(
        &self,
        source_dir: &Path,
        destination: &Path,
        create_new: bool,
    ) -> Result<ArchiveSummary> {
        if !source_dir.is_dir() {
            return Err(Error::validation(format!(
                "{} is not a directory",
                source_dir.display()
            )));
        }
        if destination.starts_with(source_dir) {
            return Err(Error::validation(format!(
                "archive {} cannot be written inside {}",
                destination.display(),
                source_dir.display()
            )));
        }

        let mut open = OpenOptions::new();
        open.write(true);
        if create_new {
            open.create_new(true);
        } else {
            open.create(true).truncate(true);
        }
        let file = open.open(destination).map_err(|e| {
            Error::io(format!("failed to create {}", destination.display()), e)
        })?;
        let mut writer = ZipWriter::new(file);

        debug!(
            "Archiving {} into {}",
            source_dir.display(),
            destination.display()
        );
        let appended = self.append_tree(&mut writer, source_dir);
        let finished = writer
            .finish()
            .map(|_| ())
            .map_err(|e| Error::from_zip(destination, e));

        let summary = appended?;
        finished?;

        debug!(
            "Wrote {} entries ({} bytes) to {}",
            summary.entries(),
            summary.bytes,
            destination.display()
        );
        Ok(summary)
    }

    fn append_tree(&self, writer: &mut ZipWriter<File>, source_dir: &Path) -> Result<ArchiveSummary> {
        let options = SimpleFileOptions::default().compression_method(self.method());
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut summary = ArchiveSummary::default();

        walk_tree(source_dir, WalkOrder::PreOrder, |entry| {
            if entry.depth() == 0 {
                return Ok(());
            }

            let path = entry.path();
            let name = entry_name(source_dir, path)?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                writer
                    .add_directory(format!("{}/", name), options)
                    .map_err(|e| Error::from_zip(path, e))?;
                summary.directories += 1;
            } else if file_type.is_file() {
                writer
                    .start_file(name, options)
                    .map_err(|e| Error::from_zip(path, e))?;
                summary.bytes += stream_file(path, &mut *writer, &mut buffer)?;
                summary.files += 1;
            } else {
                warn!("Skipping non-regular entry {}", path.display());
            }
            Ok(())
        })?;

        Ok(summary)
    }

    fn method(&self) -> CompressionMethod {
        match self.compression {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Archive entry name for `path`, relative to `root`, joined with `/`
pub fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        Error::validation(format!(
            "{} is not under {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    Error::validation(format!("{} is not valid UTF-8", path.display()))
                })?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(Error::validation(format!(
                    "unexpected component in {}",
                    relative.display()
                )));
            }
        }
    }

    Ok(parts.join("/"))
}

/// Copy `path` into `writer` in `buffer`-sized chunks, returning bytes copied
fn stream_file<W: Write>(path: &Path, writer: &mut W, buffer: &mut [u8]) -> Result<u64> {
    let read_err = |e: std::io::Error| Error::io(format!("failed to read {}", path.display()), e);

    let mut input = File::open(path).map_err(read_err)?;
    let mut total = 0u64;
    loop {
        let n = match input.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_err(e)),
        };
        writer.write_all(&buffer[..n]).map_err(|e| {
            Error::io(format!("failed to archive {}", path.display()), e)
        })?;
        total += n as u64;
    }
    Ok(total)
}
