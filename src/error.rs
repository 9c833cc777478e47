use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{op} failed for {path}: {source}")]
    IoPath {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Open failures are deliberately opaque: path missing, permission
    /// denied, and privilege-drop failure all collapse into one variant.
    #[error("cannot open file for reading: {0}")]
    CannotOpen(PathBuf),

    #[error("file exceeds read limits ({size_bytes} bytes; max {max_bytes} bytes): {path}")]
    ReadLimitExceeded {
        path: PathBuf,
        size_bytes: u64,
        max_bytes: u64,
    },

    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("invalid glob pattern: {0}")]
    InvalidPattern(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid utf-8 in file: {0}")]
    InvalidUtf8(PathBuf),

    #[error("input is too large ({size_bytes} bytes; max {max_bytes} bytes)")]
    InputTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io_path(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::IoPath {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
