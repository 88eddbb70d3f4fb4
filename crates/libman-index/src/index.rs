//! The catalog trait and the JSON-backed library index.
//!
//! Index files follow the layout:
//!
//! ```json
//! {
//!   "libraries": [
//!     {
//!       "name": "Foo",
//!       "version": "2.0.0",
//!       "author": "Jane",
//!       "url": "https://downloads.example.com/Foo-2.0.0.tar.gz",
//!       "archiveFileName": "Foo-2.0.0.tar.gz",
//!       "size": 1024,
//!       "checksum": "SHA-256:...",
//!       "dependencies": [{ "name": "Bar", "version": "1.0.0" }]
//!     }
//!   ]
//! }
//! ```
//!
//! Releases with unparseable versions or dependency requirements are skipped
//! with a warning rather than failing the whole index.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use semver::Version;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::release::{LibraryIdentity, LibraryRelease};
use crate::version::{VersionRequirement, normalize_version};

/// Read-only lookup of known library releases.
pub trait Catalog: Send + Sync {
    /// Find the newest release of `name` satisfying `requirement`.
    fn find_release(&self, name: &str, requirement: &VersionRequirement)
    -> Result<&LibraryRelease>;

    /// Declared dependencies of a release.
    fn dependencies_of<'a>(&'a self, release: &'a LibraryRelease) -> &'a [LibraryIdentity] {
        &release.dependencies
    }
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    #[serde(default)]
    libraries: Vec<RawRelease>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRelease {
    name: String,
    version: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    sentence: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    archive_file_name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    checksum: String,
    #[serde(default)]
    dependencies: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
struct RawDependency {
    name: String,
    #[serde(default)]
    version: String,
}

impl RawRelease {
    fn into_release(self) -> Result<LibraryRelease> {
        let version = normalize_version(&self.version)?;
        let dependencies = self
            .dependencies
            .into_iter()
            .map(|d| LibraryIdentity::parse(d.name, &d.version))
            .collect::<Result<Vec<_>>>()?;

        Ok(LibraryRelease {
            name: self.name,
            version,
            author: self.author,
            sentence: self.sentence,
            url: self.url,
            archive_file_name: self.archive_file_name,
            size: self.size,
            checksum: self.checksum,
            dependencies,
        })
    }
}

/// In-memory catalog keyed by library name, then version.
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    libraries: HashMap<String, BTreeMap<Version, LibraryRelease>>,
}

impl LibraryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an index from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file: IndexFile = libman_fs::ConfigStore::new().load(path)?;
        let index = Self::from_raw(file);
        tracing::debug!(
            path = %path.display(),
            libraries = index.len(),
            "Loaded library index"
        );
        Ok(index)
    }

    /// Parse an index from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: IndexFile =
            serde_json::from_str(json).map_err(|e| libman_fs::Error::ConfigParse {
                path: crate::INDEX_FILENAME.into(),
                format: "JSON".into(),
                message: e.to_string(),
            })?;
        Ok(Self::from_raw(file))
    }

    fn from_raw(file: IndexFile) -> Self {
        let mut index = Self::new();
        for raw in file.libraries {
            let label = format!("{}@{}", raw.name, raw.version);
            match raw.into_release() {
                Ok(release) => index.add_release(release),
                Err(e) => tracing::warn!(release = %label, error = %e, "Skipping invalid index entry"),
            }
        }
        index
    }

    /// Add a release. A release with the same name and version is replaced.
    pub fn add_release(&mut self, release: LibraryRelease) {
        self.libraries
            .entry(release.name.clone())
            .or_default()
            .insert(release.version.clone(), release);
    }

    /// All releases of `name`, oldest first.
    pub fn releases(&self, name: &str) -> Vec<&LibraryRelease> {
        self.libraries
            .get(name)
            .map(|versions| versions.values().collect())
            .unwrap_or_default()
    }

    /// Known library names (sorted).
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.libraries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of libraries (not releases).
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

impl Catalog for LibraryIndex {
    fn find_release(
        &self,
        name: &str,
        requirement: &VersionRequirement,
    ) -> Result<&LibraryRelease> {
        let versions = self
            .libraries
            .get(name)
            .ok_or_else(|| Error::LibraryNotFound {
                name: name.to_string(),
            })?;

        versions
            .values()
            .rev()
            .find(|release| requirement.matches(&release.version))
            .ok_or_else(|| Error::ReleaseNotFound {
                name: name.to_string(),
                requirement: requirement.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"{
        "libraries": [
            { "name": "Foo", "version": "1.0.0" },
            { "name": "Foo", "version": "2.0", "dependencies": [
                { "name": "Bar", "version": "1.0.0" },
                { "name": "Baz" }
            ]},
            { "name": "Bar", "version": "1.0.0", "checksum": "SHA-256:00" },
            { "name": "Baz", "version": "1.0.0" },
            { "name": "Broken", "version": "not-a-version" }
        ]
    }"#;

    fn req(s: &str) -> VersionRequirement {
        VersionRequirement::parse(s).unwrap()
    }

    #[test]
    fn test_latest_picks_highest() {
        let index = LibraryIndex::from_json(INDEX).unwrap();
        let release = index.find_release("Foo", &VersionRequirement::Latest).unwrap();
        assert_eq!(release.version, Version::new(2, 0, 0));
        assert_eq!(release.to_string(), "Foo@2.0.0");
    }

    #[test]
    fn test_constraint_picks_highest_satisfying() {
        let index = LibraryIndex::from_json(INDEX).unwrap();
        let release = index.find_release("Foo", &req("<2.0")).unwrap();
        assert_eq!(release.version, Version::new(1, 0, 0));
    }

    #[test]
    fn test_dependencies_parsed() {
        let index = LibraryIndex::from_json(INDEX).unwrap();
        let foo = index.find_release("Foo", &req("2.0")).unwrap();
        let deps = index.dependencies_of(foo);
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "Bar");
        assert_eq!(deps[0].version_required, req("1.0.0"));
        assert!(deps[1].version_required.is_latest());
    }

    #[test]
    fn test_unknown_library() {
        let index = LibraryIndex::from_json(INDEX).unwrap();
        let err = index.find_release("Nope", &VersionRequirement::Latest).unwrap_err();
        assert!(matches!(err, Error::LibraryNotFound { ref name } if name == "Nope"));
    }

    #[test]
    fn test_unknown_release() {
        let index = LibraryIndex::from_json(INDEX).unwrap();
        let err = index.find_release("Foo", &req("3.0")).unwrap_err();
        assert!(matches!(err, Error::ReleaseNotFound { ref name, .. } if name == "Foo"));
        assert_eq!(err.to_string(), "release Foo@3.0 not found");
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let index = LibraryIndex::from_json(INDEX).unwrap();
        assert_eq!(index.names(), vec!["Bar", "Baz", "Foo"]);
        assert_eq!(index.releases("Foo").len(), 2);
    }
}
