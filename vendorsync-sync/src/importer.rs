//! Source importer — replace a vendored tree with a freshly fetched one.
//!
//! ## `replace_tree` protocol
//!
//! 1. Rename `dst` to a hidden sibling (`.<name>.vendorsync-old`). Atomic: on
//!    failure the old tree is untouched and nothing is copied.
//! 2. Delete the sibling. On failure it is renamed back and the import fails.
//! 3. Copy `src` into `dst`, skipping VCS metadata directories.
//! 4. On any copy failure, remove the partial `dst` so the path is absent.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{import_err, SyncError};

/// Directories never copied into the vendor workspace.
pub const VCS_DIRS: &[&str] = &[".git", ".hg", ".bzr", ".svn"];

/// Materialize a source tree at a target path, replacing what was there.
pub trait TreeImporter {
    fn replace_tree(&self, src: &Path, dst: &Path) -> Result<(), SyncError>;
}

impl<T: TreeImporter + ?Sized> TreeImporter for &T {
    fn replace_tree(&self, src: &Path, dst: &Path) -> Result<(), SyncError> {
        (**self).replace_tree(src, dst)
    }
}

/// Plain filesystem importer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImporter;

impl TreeImporter for FsImporter {
    fn replace_tree(&self, src: &Path, dst: &Path) -> Result<(), SyncError> {
        if !src.is_dir() {
            return Err(import_err(
                src,
                io::Error::new(io::ErrorKind::NotFound, "source tree does not exist"),
            ));
        }
        if dst.starts_with(src) || src.starts_with(dst) {
            return Err(import_err(
                dst,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("source {} overlaps the vendor path", src.display()),
                ),
            ));
        }

        remove_existing(dst)?;

        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|e| import_err(parent, e))?;
        }
        if let Err(err) = copy_tree(src, dst) {
            if let Err(cleanup) = fs::remove_dir_all(dst) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("could not clean partial copy {}: {cleanup}", dst.display());
                }
            }
            return Err(err);
        }

        tracing::info!("imported {} -> {}", src.display(), dst.display());
        Ok(())
    }
}

fn trash_path(dst: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dst.file_name().unwrap_or_default());
    name.push(".vendorsync-old");
    dst.with_file_name(name)
}

fn remove_existing(dst: &Path) -> Result<(), SyncError> {
    if fs::symlink_metadata(dst).is_err() {
        return Ok(());
    }

    let trash = trash_path(dst);
    // Leftover from an interrupted earlier run.
    if fs::symlink_metadata(&trash).is_ok() {
        fs::remove_dir_all(&trash).map_err(|e| import_err(&trash, e))?;
    }

    fs::rename(dst, &trash).map_err(|e| import_err(dst, e))?;
    if let Err(e) = remove_any(&trash) {
        if let Err(restore) = fs::rename(&trash, dst) {
            tracing::warn!(
                "could not restore {} from {}: {restore}",
                dst.display(),
                trash.display()
            );
        }
        return Err(import_err(dst, e));
    }
    tracing::debug!("removed old tree {}", dst.display());
    Ok(())
}

fn remove_any(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn is_vcs_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| VCS_DIRS.contains(&name))
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), SyncError> {
    let walker = WalkDir::new(src)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_vcs_dir(e));

    for entry in walker {
        let entry = entry.map_err(|e| import_err(src, io::Error::from(e)))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| import_err(entry.path(), io::Error::other(e)))?;
        let target = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| import_err(&target, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target).map_err(|e| import_err(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| import_err(&target, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(link)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    fs::copy(link, target).map(|_| ())
}
