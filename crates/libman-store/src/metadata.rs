//! The `library.toml` file describing an installed library.
//!
//! ```toml
//! [library]
//! name = "Foo"
//! version = "2.0.0"
//! author = "Jane"
//! depends = ["Bar"]
//!
//! [install]
//! installed_at = "2026-01-01T00:00:00Z"
//! source = "catalog"
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use libman_index::{LibraryRelease, normalize_version};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::METADATA_FILENAME;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryMetadata {
    pub library: LibraryInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<InstallRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryInfo {
    pub name: String,
    /// Relaxed semver as written by the library author.
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sentence: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
}

/// How and when the library got into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallRecord {
    pub installed_at: DateTime<Utc>,
    /// `catalog`, `archive:<path>` or `git:<url>`.
    pub source: String,
}

impl LibraryMetadata {
    /// Metadata for a catalog release.
    pub fn from_release(release: &LibraryRelease) -> Self {
        Self {
            library: LibraryInfo {
                name: release.name.clone(),
                version: release.version.to_string(),
                author: release.author.clone(),
                sentence: release.sentence.clone(),
                depends: release
                    .dependencies
                    .iter()
                    .map(|d| d.name.clone())
                    .collect(),
            },
            install: None,
        }
    }

    /// Stamp the metadata with an install record for `source`.
    pub fn recorded(mut self, source: impl Into<String>) -> Self {
        self.install = Some(InstallRecord {
            installed_at: Utc::now(),
            source: source.into(),
        });
        self
    }

    /// Parsed library version.
    pub fn version(&self) -> Result<Version> {
        Ok(normalize_version(&self.library.version)?)
    }

    /// Read `library.toml` from a library directory.
    pub fn read(library_dir: &Path) -> Result<Self> {
        let path = library_dir.join(METADATA_FILENAME);
        if !path.is_file() {
            return Err(Error::MetadataMissing {
                path: library_dir.to_path_buf(),
            });
        }
        Ok(libman_fs::ConfigStore::new().load(&path)?)
    }

    /// Write `library.toml` into a library directory.
    pub fn write(&self, library_dir: &Path) -> Result<()> {
        let path = library_dir.join(METADATA_FILENAME);
        Ok(libman_fs::ConfigStore::new().save(&path, self)?)
    }
}
