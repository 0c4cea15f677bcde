/// Error types for linescout.
///
/// Every fallible library operation returns [`ScanResult`]. Errors raised on the
/// scanning thread never cross the thread boundary as values: the worker logs
/// them and signals completion through the shared counter instead. These types
/// therefore surface in two places only, the synchronous [`crate::scan::ScanTask::run`]
/// API and configuration loading on the calling thread.
///
/// ```rust,ignore
/// match task.run() {
///     Ok(report) => // use report.matches,
///     Err(ScanError::FileNotFound(path)) => // handle missing file,
///     Err(e) => // anything else
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while configuring or running a scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid keyword: {0}")]
    InvalidKeyword(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Controller error: {0}")]
    ControllerError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid UTF-8 in file {path}: {source}")]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

impl ScanError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_keyword(msg: impl Into<String>) -> Self {
        Self::InvalidKeyword(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn controller_error(msg: impl Into<String>) -> Self {
        Self::ControllerError(msg.into())
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        Self::EncodingError {
            path: path.into(),
            source,
        }
    }

    /// Maps an I/O error raised while opening `path` to the matching variant
    pub fn from_open_error(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

impl From<config::ConfigError> for ScanError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
