//! Production entrypoint used by the CLI: wires the `go`/`git`/filesystem
//! capabilities into a [`Reconciler`].

use vendorsync_core::ImportPath;

use crate::{
    FsImporter, GitRevisionResolver, GoGetFetcher, Reconciler, SyncConfig, SyncError,
    SyncOptions, SyncOutcome,
};

/// Run one update of `import_path` with the real external tools.
pub fn run(
    config: &SyncConfig,
    import_path: &ImportPath,
    options: SyncOptions,
) -> Result<SyncOutcome, SyncError> {
    Reconciler::new(
        config.clone(),
        GoGetFetcher::from_config(config),
        GitRevisionResolver::from_config(config),
        FsImporter,
    )
    .with_options(options)
    .update(import_path)
}
