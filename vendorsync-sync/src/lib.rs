//! # vendorsync-sync
//!
//! Fetch → resolve → compare → import → rewrite, for one vendored dependency.
//!
//! [`Reconciler`] owns the ordering; the external side effects sit behind
//! [`Fetcher`], [`RevisionResolver`] and [`TreeImporter`]. Call
//! [`pipeline::run`] to use the production `go`/`git`/filesystem versions.

pub mod config;
pub mod diff;
pub mod error;
pub mod fetch;
pub mod importer;
pub mod pipeline;
pub mod reconciler;
pub mod revision;
mod tool;

pub use config::{SyncConfig, ToolPaths};
pub use error::SyncError;
pub use fetch::{Fetcher, GoGetFetcher};
pub use importer::{FsImporter, TreeImporter};
pub use reconciler::{
    apply_update, decide, CommentPolicy, Decision, Reconciler, Stage, SyncOptions, SyncOutcome,
};
pub use revision::{GitRevisionResolver, RevisionResolver};
