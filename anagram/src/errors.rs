//! Error types for the anagram finder.
//!
//! Every fallible operation in the crate returns [`AnagramResult`]. Failures
//! raised inside the pipeline threads travel back to the session, which
//! returns the first one to its caller:
//!
//! ```rust,ignore
//! match find_anagrams(dict.as_bytes(), &charset, "listen", workers) {
//!     Ok(words) => // Print words,
//!     Err(AnagramError::FileNotFound(path)) => // Handle missing dictionary,
//!     Err(AnagramError::Decode { .. }) => // Malformed line under fail-fast,
//!     Err(e) => // Handle other errors
//! }
//! ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for anagram operations
pub type AnagramResult<T> = Result<T, AnagramError>;

/// Errors that can occur while loading a dictionary or searching it
#[derive(Error, Debug)]
pub enum AnagramError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid {charset} sequence in dictionary line: {line}")]
    Decode { charset: String, line: String },
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
    #[error("Unsupported encoding: {0} is not ASCII-compatible")]
    UnsupportedEncoding(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Search cancelled")]
    Cancelled,
    #[error("A pipeline thread panicked")]
    WorkerPanicked,
}

impl AnagramError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    /// Builds a decode error, keeping a lossy rendering of the offending bytes
    pub fn decode(charset: impl Into<String>, raw: &[u8]) -> Self {
        Self::Decode {
            charset: charset.into(),
            line: String::from_utf8_lossy(raw).into_owned(),
        }
    }

    pub fn unknown_encoding(label: impl Into<String>) -> Self {
        Self::UnknownEncoding(label.into())
    }

    pub fn unsupported_encoding(name: impl Into<String>) -> Self {
        Self::UnsupportedEncoding(name.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Maps an I/O failure on `path` to the most specific variant
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}
