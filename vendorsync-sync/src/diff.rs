//! Unified diff of a manifest rewrite, for `update --dry-run`.

use std::path::Path;

use similar::TextDiff;

use vendorsync_core::{manifest, Manifest};

use crate::SyncError;

/// Unified diff between `before` and `after` as the manifest store would
/// render them. `label` is the project-relative manifest path used in the
/// `a/` / `b/` headers. Empty when the renderings are identical.
pub fn manifest_diff(
    label: &Path,
    before: &Manifest,
    after: &Manifest,
) -> Result<String, SyncError> {
    let old = manifest::render(before)?;
    let new = manifest::render(after)?;
    if old == new {
        return Ok(String::new());
    }

    let old_header = format!("a/{}", label.display());
    let new_header = format!("b/{}", label.display());
    Ok(TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string())
}
