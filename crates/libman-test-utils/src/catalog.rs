//! Catalog fixtures.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use libman_index::{
    Catalog, LibraryIdentity, LibraryIndex, LibraryRelease, VersionRequirement, normalize_version,
};

use crate::archive::write_library_archive;

/// Builds a [`LibraryIndex`] whose releases point at real archives.
///
/// Every release gets a `.tar.gz` under the archive directory, and its `url`,
/// `size` and `checksum` describe that file, so the index can drive a full
/// download and install through a file transport.
///
/// ```rust,no_run
/// use libman_test_utils::CatalogBuilder;
///
/// let archives = tempfile::tempdir().unwrap();
/// let index = CatalogBuilder::new(archives.path())
///     .release("Foo", "2.0.0", &[("Bar", "1.0.0")])
///     .release("Bar", "1.0.0", &[])
///     .build();
/// ```
pub struct CatalogBuilder {
    archive_dir: PathBuf,
    releases: Vec<LibraryRelease>,
}

impl CatalogBuilder {
    pub fn new(archive_dir: &Path) -> Self {
        Self {
            archive_dir: archive_dir.to_path_buf(),
            releases: Vec::new(),
        }
    }

    /// Add a release depending on `(name, version requirement)` pairs.
    /// An empty requirement means the latest release.
    ///
    /// # Panics
    /// Panics on an invalid version or requirement.
    pub fn release(mut self, name: &str, version: &str, dependencies: &[(&str, &str)]) -> Self {
        let version = normalize_version(version)
            .unwrap_or_else(|e| panic!("CatalogBuilder: invalid version {version}: {e}"));
        let dependencies = dependencies
            .iter()
            .map(|(dep, req)| {
                LibraryIdentity::parse(*dep, req)
                    .unwrap_or_else(|e| panic!("CatalogBuilder: invalid requirement {req}: {e}"))
            })
            .collect();

        let archive_file_name = format!("{name}-{version}.tar.gz");
        let archive = self.archive_dir.join(&archive_file_name);
        write_library_archive(&archive, name, &version.to_string(), false);

        let size = std::fs::metadata(&archive)
            .unwrap_or_else(|e| panic!("CatalogBuilder: cannot stat {}: {e}", archive.display()))
            .len();
        let checksum = libman_fs::checksum::compute_file_checksum(&archive)
            .unwrap_or_else(|e| panic!("CatalogBuilder: cannot hash {}: {e}", archive.display()));

        self.releases.push(LibraryRelease {
            name: name.to_string(),
            version,
            author: "Test Author".to_string(),
            sentence: format!("The {name} library"),
            url: archive.display().to_string(),
            archive_file_name,
            size,
            checksum,
            dependencies,
        });
        self
    }

    /// The releases added so far.
    pub fn releases(&self) -> &[LibraryRelease] {
        &self.releases
    }

    /// Serialize the releases in the on-disk index format.
    pub fn to_json(&self) -> String {
        let libraries: Vec<serde_json::Value> = self
            .releases
            .iter()
            .map(|r| {
                let dependencies: Vec<serde_json::Value> = r
                    .dependencies
                    .iter()
                    .map(|d| {
                        let version = match &d.version_required {
                            VersionRequirement::Latest => String::new(),
                            VersionRequirement::Constraint(c) => c.to_string(),
                        };
                        serde_json::json!({ "name": d.name, "version": version })
                    })
                    .collect();
                serde_json::json!({
                    "name": r.name,
                    "version": r.version.to_string(),
                    "author": r.author,
                    "sentence": r.sentence,
                    "url": r.url,
                    "archiveFileName": r.archive_file_name,
                    "size": r.size,
                    "checksum": r.checksum,
                    "dependencies": dependencies,
                })
            })
            .collect();

        serde_json::to_string_pretty(&serde_json::json!({ "libraries": libraries }))
            .unwrap_or_else(|e| panic!("CatalogBuilder: cannot serialize index: {e}"))
    }

    /// Write the index file to `path` and return the path.
    pub fn write_index(&self, path: &Path) -> PathBuf {
        std::fs::write(path, self.to_json())
            .unwrap_or_else(|e| panic!("CatalogBuilder: cannot write {}: {e}", path.display()));
        path.to_path_buf()
    }

    pub fn build(self) -> LibraryIndex {
        let mut index = LibraryIndex::new();
        for release in self.releases {
            index.add_release(release);
        }
        index
    }
}

/// Catalog wrapper counting every lookup.
///
/// Clone the handle from [`CountingCatalog::counter`] before handing the
/// catalog to a session.
pub struct CountingCatalog<C> {
    inner: C,
    lookups: Arc<AtomicUsize>,
}

impl<C: Catalog> CountingCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared lookup counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.lookups)
    }
}

impl<C: Catalog> Catalog for CountingCatalog<C> {
    fn find_release(
        &self,
        name: &str,
        requirement: &VersionRequirement,
    ) -> libman_index::Result<&LibraryRelease> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_release(name, requirement)
    }

    fn dependencies_of<'a>(&'a self, release: &'a LibraryRelease) -> &'a [LibraryIdentity] {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.dependencies_of(release)
    }
}
