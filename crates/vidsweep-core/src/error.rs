//! Unified error type for vidsweep.
//!
//! Failures fall into two groups. Fatal errors ([`Error::DirectoryNotFound`],
//! [`Error::Validation`]) abort the whole batch. Per-file errors
//! ([`Error::TranscodeFailed`], [`Error::DeleteFailed`]) are caught at the
//! per-file boundary and recorded in the run report.

use std::path::{Path, PathBuf};

/// Exit code for a run in which every candidate was handled.
pub const EXIT_OK: u8 = 0;
/// Exit code for a run aborted by a fatal error.
pub const EXIT_FATAL: u8 = 1;
/// Exit code for a run that finished with at least one per-file failure.
pub const EXIT_PARTIAL: u8 = 2;

/// Unified error type covering all failure modes in vidsweep.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source directory is missing or is not a directory.
    #[error("source directory not found: {}", .path.display())]
    DirectoryNotFound {
        /// The directory that was looked up.
        path: PathBuf,
    },

    /// The external tool did not convert a file.
    #[error("transcode failed for {}: {message}", .path.display())]
    TranscodeFailed {
        /// The input file that was being converted.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// A file was converted but its source could not be removed.
    #[error("failed to delete {}: {source}", .path.display())]
    DeleteFailed {
        /// The source file that was left behind.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An external tool could not be run or returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Configuration failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Whether this error aborts the whole batch rather than a single file.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::TranscodeFailed { .. } | Error::DeleteFailed { .. }
        )
    }

    /// Map this error to the process exit code the CLI reports for it.
    pub fn exit_code(&self) -> u8 {
        if self.is_fatal() {
            EXIT_FATAL
        } else {
            EXIT_PARTIAL
        }
    }

    /// Convenience constructor for [`Error::DirectoryNotFound`].
    pub fn directory_not_found(path: impl AsRef<Path>) -> Self {
        Error::DirectoryNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Convenience constructor for [`Error::TranscodeFailed`].
    pub fn transcode_failed(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Error::TranscodeFailed {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::DeleteFailed`].
    pub fn delete_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::DeleteFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
