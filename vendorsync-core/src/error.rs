//! Error types for vendorsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Rejections for a malformed package identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportPathError {
    #[error("import path must not be empty")]
    Empty,

    #[error("import path '{path}' contains invalid character {found:?}")]
    InvalidChar { path: String, found: char },

    #[error("import path '{0}' must not start or end with '/'")]
    Slash(String),

    #[error("import path '{path}' has invalid segment '{segment}'")]
    BadSegment { path: String, segment: String },
}

/// All errors that can arise from manifest load / save.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file did not exist at the expected path.
    #[error("no manifest found at {path}")]
    NotFound { path: PathBuf },

    /// Read or JSON decode failure on load. Includes line/column context from serde_json.
    #[error("failed to parse manifest at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// JSON encoding failure (save path).
    #[error("failed to encode manifest: {0}")]
    Encode(#[from] serde_json::Error),

    /// I/O failure while writing or renaming the manifest.
    #[error("failed to write manifest at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn write_err(path: impl Into<PathBuf>, source: std::io::Error) -> ManifestError {
    ManifestError::WriteFailed {
        path: path.into(),
        source,
    }
}
