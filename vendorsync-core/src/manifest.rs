//! Manifest store — load / save `Godeps/Godeps.json`.
//!
//! # On-disk format
//!
//! ```text
//! {
//! 	"ImportPath": "example.com/project",
//! 	"GoVersion": "go1.4",
//! 	"Packages": ["./..."],
//! 	"Deps": [
//! 		{ "ImportPath": "github.com/foo/bar", "Rev": "<sha>", "Comment": "" }
//! 	]
//! }
//! ```
//!
//! Output is tab-indented with a trailing newline. Key order is fixed: the
//! known keys in the order above, then any pass-through keys sorted by name.
//!
//! Writes never truncate the existing file: serialize → `<file>.tmp` sibling →
//! `sync_all` → `rename`. The `.tmp` lives in the same directory as the target
//! so the rename stays on one filesystem. A rewritten manifest keeps the
//! permissions of the file it replaces.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{write_err, ManifestError};
use crate::types::Manifest;

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

/// Read and decode the manifest at `path`.
///
/// Returns `ManifestError::NotFound` if absent, `ManifestError::Malformed`
/// (with path + line context) if unreadable or not a valid manifest.
pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(ManifestError::Malformed {
                path: path.to_path_buf(),
                source: Box::new(e),
            })
        }
    };
    let manifest: Manifest =
        serde_json::from_str(&contents).map_err(|e| ManifestError::Malformed {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
    tracing::debug!(
        "loaded {} ({} deps)",
        path.display(),
        manifest.dependencies.len()
    );
    Ok(manifest)
}

// ---------------------------------------------------------------------------
// 2. Render
// ---------------------------------------------------------------------------

/// Serialize `manifest` exactly as [`save`] would write it.
pub fn render(manifest: &Manifest) -> Result<String, ManifestError> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    manifest.serialize(&mut ser)?;
    buf.push(b'\n');
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `manifest` to `path`.
///
/// On any failure the previous file content is left intact and the `.tmp`
/// sibling is removed.
pub fn save(path: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    save_with_tmp(path, manifest, &tmp_path(path))
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tmp", path.display()))
}

fn save_with_tmp(path: &Path, manifest: &Manifest, tmp: &Path) -> Result<(), ManifestError> {
    let json = render(manifest)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_err(parent, e))?;
    }

    if let Err(e) = write_tmp(tmp, json.as_bytes(), path) {
        let _ = fs::remove_file(tmp);
        return Err(write_err(tmp, e));
    }

    if let Err(e) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(write_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(())
}

/// Write and flush `tmp`, carrying over the permissions of `target` if it
/// already exists.
fn write_tmp(tmp: &Path, contents: &[u8], target: &Path) -> io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    match fs::metadata(target) {
        Ok(meta) => file.set_permissions(meta.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
