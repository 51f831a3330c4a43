//! Error types for vendorsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use vendorsync_core::{ImportPath, ManifestError};

/// All errors that can arise from a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Manifest could not be loaded or saved.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The upstream fetch failed or left nothing where it was expected.
    #[error("fetch failed for {import_path}: {reason}")]
    FetchFailed {
        import_path: ImportPath,
        reason: String,
    },

    /// No revision could be determined for a fetched tree.
    #[error("cannot determine revision in {path}: {reason}")]
    RevisionUnavailable { path: PathBuf, reason: String },

    /// Removing the old vendor tree or copying the new one failed.
    #[error("import into {path} failed: {source}")]
    ImportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::ImportFailed`].
pub(crate) fn import_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::ImportFailed {
        path: path.into(),
        source,
    }
}
