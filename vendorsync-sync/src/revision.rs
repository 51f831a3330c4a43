//! Revision resolver: which snapshot did the fetch produce?

use std::fs;
use std::path::{Path, PathBuf};

use vendorsync_core::Revision;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::tool::run_tool;

/// Produce a stable identifier for the source tree at `path`.
///
/// A tree without resolvable history is an error, never "unchanged".
pub trait RevisionResolver {
    fn current_revision(&self, path: &Path) -> Result<Revision, SyncError>;
}

impl<T: RevisionResolver + ?Sized> RevisionResolver for &T {
    fn current_revision(&self, path: &Path) -> Result<Revision, SyncError> {
        (**self).current_revision(path)
    }
}

/// `git rev-parse --show-toplevel HEAD`, run inside the fetched tree.
///
/// git searches parent directories for a repository, so a tree without its
/// own metadata would report whatever repository encloses it. When source
/// roots are set, the repository top level must lie strictly below one of
/// them.
#[derive(Debug, Clone)]
pub struct GitRevisionResolver {
    git: PathBuf,
    source_roots: Vec<PathBuf>,
}

impl GitRevisionResolver {
    pub fn new(git: impl Into<PathBuf>) -> Self {
        Self {
            git: git.into(),
            source_roots: Vec::new(),
        }
    }

    pub fn with_source_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.source_roots = roots.into_iter().collect();
        self
    }

    /// Repositories must live under `<search-path>/src`.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.tools.git)
            .with_source_roots(config.search_paths.iter().map(|p| p.join("src")))
    }

    fn owns(&self, toplevel: &Path) -> bool {
        if self.source_roots.is_empty() {
            return true;
        }
        let Ok(toplevel) = fs::canonicalize(toplevel) else {
            return false;
        };
        self.source_roots
            .iter()
            .filter_map(|root| fs::canonicalize(root).ok())
            .any(|root| toplevel != root && toplevel.starts_with(&root))
    }
}

impl RevisionResolver for GitRevisionResolver {
    fn current_revision(&self, path: &Path) -> Result<Revision, SyncError> {
        let unavailable = |reason: String| SyncError::RevisionUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_dir() {
            return Err(unavailable("directory does not exist".to_string()));
        }

        let out = run_tool(
            &self.git,
            ["rev-parse", "--show-toplevel", "HEAD"],
            Some(path),
            &[],
        )
        .map_err(unavailable)?;
        let mut lines = out.lines().map(str::trim);
        let toplevel = lines.next().unwrap_or_default();
        let rev = lines.next().unwrap_or_default();
        if toplevel.is_empty() || rev.is_empty() {
            return Err(unavailable("no HEAD revision reported".to_string()));
        }
        if !self.owns(Path::new(toplevel)) {
            return Err(unavailable(format!(
                "no repository of its own; enclosing repository is {toplevel}"
            )));
        }
        tracing::debug!("{} is at {rev} (repository {toplevel})", path.display());
        Ok(Revision::from(rev))
    }
}
