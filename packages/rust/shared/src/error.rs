//! Error types for texprose.
//!
//! Library crates use [`TexProseError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all texprose operations.
#[derive(Debug, thiserror::Error)]
pub enum TexProseError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory traversal error (unreadable directory, broken entry, loop).
    #[error("walk error at {path:?}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Invalid input (missing source root, zero chunk size, bad prefix).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Manifest or config serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TexProseError>;

impl TexProseError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a walk error for the entry at `path`.
    pub fn walk(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Walk {
            path: path.into(),
            message: msg.into(),
        }
    }
}
