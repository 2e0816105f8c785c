// src/error.rs

//! Error types for JAR-to-bundle conversion
//!
//! Errors fall into two policy categories. Validation errors are raised before
//! any file is touched, so a batch caller may treat them as "bad input".
//! Everything else (I/O, unreadable archives) happened mid-conversion and has
//! already been cleaned up by the time it reaches the caller.
//!
//! "Bundle already exists" is not an error; see
//! [`ConversionOutcome::Skipped`](crate::bundle::ConversionOutcome::Skipped).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a JAR into a bundle
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any I/O happened
    #[error("validation failed: {0}")]
    Validation(String),

    /// File-system operation failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Source could not be read as a ZIP/JAR archive
    #[error("invalid archive {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Configuration file missing or malformed
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification used by callers to pick a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Nothing was written; the input itself is wrong
    Validation,
    /// The conversion started and failed; partial output was removed
    Io,
}

impl Error {
    /// Create a validation error with a message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wrap an I/O error with a description of what was being attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Convert a ZIP library error, keeping I/O failures as I/O
    pub fn from_zip(path: &Path, err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(source) => {
                Self::io(format!("failed to access archive {}", path.display()), source)
            }
            other => Self::Format {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    /// Policy category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::Config(_) => ErrorCategory::Validation,
            Self::Io { .. } | Self::Format { .. } => ErrorCategory::Io,
        }
    }

    /// True if a create-new open found the path already taken
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::AlreadyExists
        )
    }

    /// True if the input was rejected before any I/O
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }
}
