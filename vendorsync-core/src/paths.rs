use std::path::{Path, PathBuf};

use crate::types::ImportPath;

pub const GODEPS_DIR: &str = "Godeps";
pub const MANIFEST_FILE: &str = "Godeps.json";
pub const WORKSPACE_DIR: &str = "_workspace";

/// `Godeps/Godeps.json`, relative to the project root.
pub fn default_manifest_relative_path() -> PathBuf {
    Path::new(GODEPS_DIR).join(MANIFEST_FILE)
}

/// `Godeps/_workspace/src`, relative to the project root.
pub fn default_vendor_relative_path() -> PathBuf {
    Path::new(GODEPS_DIR).join(WORKSPACE_DIR).join("src")
}

/// `<root>/<import/path/segments>`. Pure, no I/O.
pub fn package_dir(root: &Path, import_path: &ImportPath) -> PathBuf {
    import_path
        .segments()
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Where a fetch into `search_path` lands: `<search_path>/src/<import-path>`.
pub fn fetched_package_dir(search_path: &Path, import_path: &ImportPath) -> PathBuf {
    package_dir(&search_path.join("src"), import_path)
}
