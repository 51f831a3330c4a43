//! Core library for vendorsync: manifest types, manifest store, path layout, errors.
//!
//! - [`types`]: [`ImportPath`], [`Revision`], [`Manifest`], [`DependencyEntry`]
//! - [`manifest`]: load / render / atomic save of `Godeps/Godeps.json`
//! - [`paths`]: project-relative layout of the manifest and vendor workspace
//! - [`error`]: [`ManifestError`], [`ImportPathError`]

pub mod error;
pub mod manifest;
pub mod paths;
pub mod types;

pub use error::{ImportPathError, ManifestError};
pub use types::{DependencyEntry, ImportPath, Manifest, Revision};
