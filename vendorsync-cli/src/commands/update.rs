//! `vendorsync update <import-path>` — re-vendor one dependency at its latest
//! upstream revision.

use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vendorsync_core::ImportPath;
use vendorsync_sync::{pipeline, CommentPolicy, SyncConfig, SyncOptions, SyncOutcome, ToolPaths};

/// Arguments for `vendorsync update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Import path of the dependency, e.g. github.com/user/repo.
    #[arg(value_name = "IMPORT-PATH")]
    pub import_path: ImportPath,

    /// Fetch and compare, then show the manifest change without vendoring anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Carry the replaced entry's Comment over to the new entry.
    #[arg(long)]
    pub keep_comment: bool,
}

impl UpdateArgs {
    pub fn run(self) -> Result<()> {
        let config = config_from_env()?;
        let options = SyncOptions {
            dry_run: self.dry_run,
            comment_policy: if self.keep_comment {
                CommentPolicy::Preserve
            } else {
                CommentPolicy::Discard
            },
        };

        let outcome = pipeline::run(&config, &self.import_path, options)
            .with_context(|| format!("update of {} aborted", self.import_path))?;
        print_outcome(&outcome);
        Ok(())
    }
}

/// Resolve the ambient process state once: working directory, `GOPATH`, and
/// the optional `VENDORSYNC_GO` / `VENDORSYNC_GIT` tool overrides.
fn config_from_env() -> Result<SyncConfig> {
    let project_root = std::env::current_dir().context("could not determine current directory")?;
    let search_paths = std::env::var_os("GOPATH")
        .map(|raw| search_paths_from(&raw))
        .unwrap_or_default();

    let mut tools = ToolPaths::default();
    if let Some(go) = std::env::var_os("VENDORSYNC_GO") {
        tools.go = PathBuf::from(go);
    }
    if let Some(git) = std::env::var_os("VENDORSYNC_GIT") {
        tools.git = PathBuf::from(git);
    }

    Ok(SyncConfig::new(project_root, search_paths).with_tools(tools))
}

/// Split a `GOPATH`-style list, dropping empty entries.
fn search_paths_from(raw: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(raw)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

fn print_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::UpToDate {
            import_path,
            revision,
        } => println!("No need to update {import_path} (already at {revision})"),
        SyncOutcome::Updated {
            import_path,
            previous: Some(previous),
            revision,
        } => println!("✓ updated {import_path} {previous} → {revision}"),
        SyncOutcome::Updated {
            import_path,
            previous: None,
            revision,
        } => println!("✓ updated {import_path} (newly vendored at {revision})"),
        SyncOutcome::WouldUpdate {
            import_path,
            previous,
            revision,
            manifest_diff,
        } => {
            let from = previous
                .as_ref()
                .map_or_else(|| "(not vendored)".to_string(), |p| p.to_string());
            println!("[dry-run] would update {import_path} {from} → {revision}");
            print!("{manifest_diff}");
            if !manifest_diff.is_empty() && !manifest_diff.ends_with('\n') {
                println!();
            }
        }
    }
}
