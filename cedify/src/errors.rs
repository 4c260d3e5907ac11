/// Error types for cedify.
///
/// Failures fall into two groups. Discovery and configuration errors stop a run
/// before any file is touched. Per-file errors (I/O and decoding) are caught by
/// the rewriter and turned into a failed [`RewriteResult`](crate::results::RewriteResult),
/// so the run keeps going:
///
/// ```rust,ignore
/// match cedify::rewrite::rewrite_file(&path, &converter, &options).status {
///     RewriteStatus::Updated { amounts, bare } => // counted as a success,
///     RewriteStatus::Failed { message } => // reported, run continues,
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while discovering or converting files
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Cannot walk {path}: {message}")]
    Discovery { path: PathBuf, message: String },
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid UTF-8 in file {path}: {source}")]
    Encoding {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

impl ConvertError {
    pub fn discovery(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Discovery {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        Self::Encoding {
            path: path.into(),
            source,
        }
    }

    /// Maps an I/O error on `path` to the most specific variant.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}
