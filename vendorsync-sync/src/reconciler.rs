//! Drives one dependency update end to end.
//!
//! ## State machine
//!
//! ```text
//! Init -> ManifestLoaded -> Fetched -> RevisionResolved -> {NoOp | Updating}
//!      -> Imported -> ManifestSaved
//! ```
//!
//! Any failing step returns its error immediately. The vendor tree is only
//! touched in `Imported` and the manifest only in `ManifestSaved`, after every
//! fallible step before them has succeeded, so an abort never leaves the
//! manifest ahead of the vendor tree.
//!
//! Concurrent runs against the same project are not supported; there is no
//! locking.

use std::fmt;

use vendorsync_core::{manifest, DependencyEntry, ImportPath, Manifest, Revision};

use crate::config::SyncConfig;
use crate::diff::manifest_diff;
use crate::error::SyncError;
use crate::fetch::Fetcher;
use crate::importer::TreeImporter;
use crate::revision::RevisionResolver;

// ---------------------------------------------------------------------------
// Options and outcomes
// ---------------------------------------------------------------------------

/// What happens to the `Comment` of an entry being replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentPolicy {
    /// New entry starts with an empty comment.
    #[default]
    Discard,
    /// Carry the old comment over to the new entry.
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOptions {
    /// Stop after the decision and report what would change.
    pub dry_run: bool,
    pub comment_policy: CommentPolicy,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The manifest already pins the fetched revision; nothing was touched.
    UpToDate {
        import_path: ImportPath,
        revision: Revision,
    },
    /// Vendor tree replaced and manifest rewritten.
    Updated {
        import_path: ImportPath,
        previous: Option<Revision>,
        revision: Revision,
    },
    /// Dry run: an update is due. `manifest_diff` is the unified diff the
    /// manifest rewrite would produce.
    WouldUpdate {
        import_path: ImportPath,
        previous: Option<Revision>,
        revision: Revision,
        manifest_diff: String,
    },
}

/// Reconciler progress, logged at `debug` on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ManifestLoaded,
    Fetched,
    RevisionResolved,
    NoOp,
    Updating,
    Imported,
    ManifestSaved,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::ManifestLoaded => "manifest-loaded",
            Stage::Fetched => "fetched",
            Stage::RevisionResolved => "revision-resolved",
            Stage::NoOp => "no-op",
            Stage::Updating => "updating",
            Stage::Imported => "imported",
            Stage::ManifestSaved => "manifest-saved",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Result of comparing the manifest against a freshly resolved revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    NoOp,
    /// `previous` is the first existing entry for the path, if any.
    Update { previous: Option<DependencyEntry> },
}

/// Compare by exact string equality. Only a single existing entry with the
/// same revision is a no-op; duplicate entries always force a rewrite that
/// collapses them.
pub fn decide(manifest: &Manifest, import_path: &ImportPath, revision: &Revision) -> Decision {
    let mut existing = manifest.entries_for(import_path);
    let first = existing.next();
    let duplicates = existing.count();

    match first {
        Some(entry) if duplicates == 0 && entry.revision == *revision => Decision::NoOp,
        Some(entry) => {
            if duplicates > 0 {
                tracing::warn!(
                    "manifest lists {import_path} {} times; collapsing to one entry",
                    duplicates + 1
                );
            }
            Decision::Update {
                previous: Some(entry.clone()),
            }
        }
        None => Decision::Update { previous: None },
    }
}

/// The manifest after recording `revision` for `import_path`: every old entry
/// for the path removed, the new one appended, all others untouched.
pub fn apply_update(
    manifest: &Manifest,
    import_path: &ImportPath,
    revision: Revision,
    previous: Option<&DependencyEntry>,
    policy: CommentPolicy,
) -> Manifest {
    let mut entry = DependencyEntry::new(import_path, revision);
    if let (CommentPolicy::Preserve, Some(prev)) = (policy, previous) {
        entry.comment = prev.comment.clone();
    }
    manifest.with_entry(entry)
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Single-dependency update driver. Capabilities are injected so the
/// decision logic runs against fakes in tests.
pub struct Reconciler<F, R, I> {
    config: SyncConfig,
    fetcher: F,
    resolver: R,
    importer: I,
    options: SyncOptions,
}

impl<F, R, I> Reconciler<F, R, I>
where
    F: Fetcher,
    R: RevisionResolver,
    I: TreeImporter,
{
    pub fn new(config: SyncConfig, fetcher: F, resolver: R, importer: I) -> Self {
        Self {
            config,
            fetcher,
            resolver,
            importer,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Bring the vendored copy of `import_path` and its manifest entry up to
    /// the latest upstream revision.
    pub fn update(&self, import_path: &ImportPath) -> Result<SyncOutcome, SyncError> {
        let step = |stage: Stage| tracing::debug!("{import_path}: {stage}");
        step(Stage::Init);

        let manifest_path = self.config.manifest_path();
        let current = manifest::load(&manifest_path)?;
        step(Stage::ManifestLoaded);

        let staged = self.fetcher.fetch_latest(import_path)?;
        step(Stage::Fetched);

        let revision = self.resolver.current_revision(&staged)?;
        step(Stage::RevisionResolved);

        let previous = match decide(&current, import_path, &revision) {
            Decision::NoOp => {
                step(Stage::NoOp);
                tracing::info!("{import_path} already at {revision}");
                return Ok(SyncOutcome::UpToDate {
                    import_path: import_path.clone(),
                    revision,
                });
            }
            Decision::Update { previous } => previous,
        };
        step(Stage::Updating);

        let next = apply_update(
            &current,
            import_path,
            revision.clone(),
            previous.as_ref(),
            self.options.comment_policy,
        );
        let previous = previous.map(|p| p.revision);

        if self.options.dry_run {
            let diff = manifest_diff(&self.config.manifest_relative_path, &current, &next)?;
            tracing::info!("[dry-run] would update {import_path} to {revision}");
            return Ok(SyncOutcome::WouldUpdate {
                import_path: import_path.clone(),
                previous,
                revision,
                manifest_diff: diff,
            });
        }

        self.importer
            .replace_tree(&staged, &self.config.vendor_dir(import_path))?;
        step(Stage::Imported);

        manifest::save(&manifest_path, &next)?;
        step(Stage::ManifestSaved);

        Ok(SyncOutcome::Updated {
            import_path: import_path.clone(),
            previous,
            revision,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
