//! Explicit run configuration.
//!
//! Nothing in this crate reads the working directory or environment; the
//! binary resolves those once and hands a [`SyncConfig`] to the reconciler.

use std::path::PathBuf;

use vendorsync_core::{paths, ImportPath};

/// External tool binaries used by the production capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub go: PathBuf,
    pub git: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            go: PathBuf::from("go"),
            git: PathBuf::from("git"),
        }
    }
}

/// Where the project lives and where fetched sources land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub project_root: PathBuf,
    pub manifest_relative_path: PathBuf,
    pub vendor_relative_path: PathBuf,
    /// Ordered search paths (`GOPATH` entries) a fetch may land under.
    pub search_paths: Vec<PathBuf>,
    pub tools: ToolPaths,
}

impl SyncConfig {
    /// Godeps layout under `project_root`, default tool binaries.
    pub fn new(project_root: impl Into<PathBuf>, search_paths: Vec<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            manifest_relative_path: paths::default_manifest_relative_path(),
            vendor_relative_path: paths::default_vendor_relative_path(),
            search_paths,
            tools: ToolPaths::default(),
        }
    }

    pub fn with_tools(mut self, tools: ToolPaths) -> Self {
        self.tools = tools;
        self
    }

    /// `<project_root>/Godeps/Godeps.json`
    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(&self.manifest_relative_path)
    }

    /// `<project_root>/Godeps/_workspace/src`
    pub fn vendor_root(&self) -> PathBuf {
        self.project_root.join(&self.vendor_relative_path)
    }

    /// `<project_root>/Godeps/_workspace/src/<import-path>`
    pub fn vendor_dir(&self, import_path: &ImportPath) -> PathBuf {
        paths::package_dir(&self.vendor_root(), import_path)
    }
}
