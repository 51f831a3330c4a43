//! Domain types for the vendored-dependency manifest.
//!
//! Field names on the wire follow the `Godeps.json` convention (`ImportPath`,
//! `Rev`, `Deps`, ...). All types are serializable via serde + serde_json.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ImportPathError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A validated package identifier, as written in import statements.
///
/// Always a relative, slash-separated path with no empty, `.` or `..`
/// segments, so it can be joined safely under the vendor workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportPath(String);

impl ImportPath {
    /// Validate `raw` and wrap it.
    pub fn parse(raw: &str) -> Result<Self, ImportPathError> {
        if raw.trim().is_empty() {
            return Err(ImportPathError::Empty);
        }
        if let Some(c) = raw
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || *c == '\\')
        {
            return Err(ImportPathError::InvalidChar {
                path: raw.to_owned(),
                found: c,
            });
        }
        if raw.starts_with('/') || raw.ends_with('/') {
            return Err(ImportPathError::Slash(raw.to_owned()));
        }
        for segment in raw.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(ImportPathError::BadSegment {
                    path: raw.to_owned(),
                    segment: segment.to_owned(),
                });
            }
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments in order (`github.com`, `user`, `repo`).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl FromStr for ImportPath {
    type Err = ImportPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for ImportPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An opaque snapshot identifier (usually a commit hash). Compared only for
/// exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Revision(pub String);

impl Revision {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Revision {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Revision {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One vendored dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEntry {
    #[serde(rename = "ImportPath")]
    pub import_path: String,
    #[serde(rename = "Rev")]
    pub revision: Revision,
    #[serde(rename = "Comment", default)]
    pub comment: String,
}

impl DependencyEntry {
    /// A fresh entry with an empty comment.
    pub fn new(import_path: &ImportPath, revision: Revision) -> Self {
        Self {
            import_path: import_path.as_str().to_owned(),
            revision,
            comment: String::new(),
        }
    }

    pub fn is_for(&self, import_path: &ImportPath) -> bool {
        self.import_path == import_path.as_str()
    }
}

/// Root of `Godeps/Godeps.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(rename = "ImportPath", default)]
    pub root_import_path: String,
    #[serde(rename = "GoVersion", default)]
    pub tool_version: String,
    #[serde(rename = "Packages", default, deserialize_with = "null_as_empty")]
    pub packages: Vec<String>,
    #[serde(rename = "Deps", default, deserialize_with = "null_as_empty")]
    pub dependencies: Vec<DependencyEntry>,
    /// Keys this tool does not interpret (e.g. `GodepVersion`), passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Go writes a nil slice as `null`; read it back as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Manifest {
    /// All entries recorded for `import_path`, in manifest order.
    pub fn entries_for<'a>(
        &'a self,
        import_path: &'a ImportPath,
    ) -> impl Iterator<Item = &'a DependencyEntry> + 'a {
        self.dependencies.iter().filter(move |d| d.is_for(import_path))
    }

    /// The first entry recorded for `import_path`.
    pub fn find(&self, import_path: &ImportPath) -> Option<&DependencyEntry> {
        self.dependencies.iter().find(|d| d.is_for(import_path))
    }

    /// Replace whatever is recorded for the entry's import path with `entry`,
    /// appended after the remaining dependencies. Remaining entries keep
    /// their relative order.
    pub fn with_entry(&self, entry: DependencyEntry) -> Manifest {
        let mut next = Manifest {
            dependencies: self
                .dependencies
                .iter()
                .filter(|d| d.import_path != entry.import_path)
                .cloned()
                .collect(),
            ..self.clone()
        };
        next.dependencies.push(entry);
        next
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
