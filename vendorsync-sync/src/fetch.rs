//! Upstream fetch capability.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use vendorsync_core::{paths, ImportPath};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::tool::run_tool;

/// Fetch the latest upstream source for a package into a staging location.
pub trait Fetcher {
    /// Returns the directory the freshly fetched source now lives in.
    fn fetch_latest(&self, import_path: &ImportPath) -> Result<PathBuf, SyncError>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch_latest(&self, import_path: &ImportPath) -> Result<PathBuf, SyncError> {
        (**self).fetch_latest(import_path)
    }
}

/// `go get -u <import-path>` into the configured search paths.
///
/// The child process sees exactly the configured search paths as `GOPATH`
/// (and `GO111MODULE=off`) so the fetch lands where the lookup expects it.
/// The staged tree is `<search-path>/src/<import-path>` in the first search
/// path that contains it.
#[derive(Debug, Clone)]
pub struct GoGetFetcher {
    go: PathBuf,
    search_paths: Vec<PathBuf>,
}

impl GoGetFetcher {
    pub fn new(go: impl Into<PathBuf>, search_paths: Vec<PathBuf>) -> Self {
        Self {
            go: go.into(),
            search_paths,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.tools.go, config.search_paths.clone())
    }

    fn failed(import_path: &ImportPath, reason: impl Into<String>) -> SyncError {
        SyncError::FetchFailed {
            import_path: import_path.clone(),
            reason: reason.into(),
        }
    }
}

impl Fetcher for GoGetFetcher {
    fn fetch_latest(&self, import_path: &ImportPath) -> Result<PathBuf, SyncError> {
        if self.search_paths.is_empty() {
            return Err(Self::failed(
                import_path,
                "no search paths configured (is GOPATH set?)",
            ));
        }
        let gopath: OsString = std::env::join_paths(&self.search_paths)
            .map_err(|e| Self::failed(import_path, format!("invalid search path: {e}")))?;

        tracing::info!("fetching {import_path}");
        run_tool(
            &self.go,
            ["get", "-u", import_path.as_str()],
            None,
            &[("GOPATH", gopath.as_os_str()), ("GO111MODULE", OsStr::new("off"))],
        )
        .map_err(|reason| Self::failed(import_path, reason))?;

        self.search_paths
            .iter()
            .map(|sp| paths::fetched_package_dir(sp, import_path))
            .find(|dir| dir.is_dir())
            .ok_or_else(|| {
                Self::failed(
                    import_path,
                    "fetched source not found under any search path",
                )
            })
    }
}
