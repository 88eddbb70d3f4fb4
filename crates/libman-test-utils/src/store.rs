//! Store fixtures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use libman_fs::sanitize_name;
use libman_index::LibraryRelease;
use libman_store::{
    FsLibraryStore, InstallLocation, InstalledLibrary, LibraryMetadata, LibraryStore, StoreLayout,
};
use tempfile::TempDir;

use crate::archive::library_toml;

/// Temporary directories for a store, its download cache and release archives.
///
/// ```text
/// <root>/user/        user install location
/// <root>/builtin/     bundled install location
/// <root>/downloads/   download cache
/// <root>/archives/    release archives served to the transport
/// ```
pub struct TestStore {
    temp_dir: TempDir,
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["user", "builtin", "downloads", "archives"] {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn user_dir(&self) -> PathBuf {
        self.root().join("user")
    }

    pub fn builtin_dir(&self) -> PathBuf {
        self.root().join("builtin")
    }

    pub fn download_dir(&self) -> PathBuf {
        self.root().join("downloads")
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root().join("archives")
    }

    /// Layout with a read-only builtin location.
    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(self.user_dir(), self.builtin_dir())
    }

    pub fn store(&self) -> FsLibraryStore {
        FsLibraryStore::new(self.layout())
    }

    fn location_dir(&self, location: InstallLocation) -> PathBuf {
        match location {
            InstallLocation::Builtin => self.builtin_dir(),
            InstallLocation::User | InstallLocation::AnyWritable => self.user_dir(),
        }
    }

    /// Put a library directly into a location, bypassing the store.
    pub fn seed(&self, location: InstallLocation, name: &str, version: &str) -> PathBuf {
        let dir = self.location_dir(location).join(sanitize_name(name));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("library.toml"), library_toml(name, version, &[])).unwrap();
        dir
    }

    /// Assert that `name` is installed at `location` with `version`.
    ///
    /// # Panics
    /// Panics with a descriptive message if it is not.
    pub fn assert_installed(&self, location: InstallLocation, name: &str, version: &str) {
        let dir = self.location_dir(location).join(sanitize_name(name));
        let metadata = LibraryMetadata::read(&dir).unwrap_or_else(|e| {
            panic!("Expected {name} to be installed at {}: {e}", dir.display())
        });
        let expected = libman_index::normalize_version(version).unwrap();
        assert_eq!(
            metadata.version().unwrap(),
            expected,
            "Wrong version of {name} installed at {}",
            dir.display()
        );
    }

    /// Assert that no directory for `name` exists at `location`.
    pub fn assert_not_installed(&self, location: InstallLocation, name: &str) {
        let dir = self.location_dir(location).join(sanitize_name(name));
        assert!(
            !dir.exists(),
            "Expected {name} NOT to be installed, found {}",
            dir.display()
        );
    }
}

/// One mutating store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Install { library: String, target: PathBuf },
    Uninstall { library: String },
    InstallArchive { path: PathBuf, overwrite: bool },
    InstallFromGit { url: String, overwrite: bool },
}

impl std::fmt::Display for StoreCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Install { library, .. } => write!(f, "install {library}"),
            Self::Uninstall { library } => write!(f, "uninstall {library}"),
            Self::InstallArchive { path, .. } => write!(f, "install-archive {}", path.display()),
            Self::InstallFromGit { url, .. } => write!(f, "install-git {url}"),
        }
    }
}

/// Shared, cloneable log of store mutations.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<StoreCall>>>);

impl CallLog {
    fn push(&self, call: StoreCall) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.0.lock().unwrap().clone()
    }

    /// Calls rendered as `install Foo@2.0.0`, `uninstall Foo@1.0.0`, ...
    pub fn rendered(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

/// Store wrapper that records every mutation and can inject failures.
///
/// Queries pass straight through and are not recorded. Grab the
/// [`CallLog`] with [`RecordingStore::log`] before handing the store over.
pub struct RecordingStore<S> {
    inner: S,
    log: CallLog,
    fail_install: HashSet<String>,
    fail_uninstall: HashSet<String>,
    fail_list: bool,
}

impl<S: LibraryStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            log: CallLog::default(),
            fail_install: HashSet::new(),
            fail_uninstall: HashSet::new(),
            fail_list: false,
        }
    }

    /// Make installing the library called `name` fail.
    pub fn fail_install(mut self, name: &str) -> Self {
        self.fail_install.insert(name.to_string());
        self
    }

    /// Make uninstalling the library called `name` fail.
    pub fn fail_uninstall(mut self, name: &str) -> Self {
        self.fail_uninstall.insert(name.to_string());
        self
    }

    /// Make [`LibraryStore::list_installed`] fail, which breaks session refreshes.
    pub fn fail_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

fn injected(path: &Path) -> libman_store::Error {
    libman_store::Error::Fs(libman_fs::Error::io(
        path,
        std::io::Error::other("injected failure"),
    ))
}

impl<S: LibraryStore> LibraryStore for RecordingStore<S> {
    fn installed(
        &self,
        name: &str,
        location: InstallLocation,
    ) -> libman_store::Result<Option<InstalledLibrary>> {
        self.inner.installed(name, location)
    }

    fn list_installed(&self) -> libman_store::Result<Vec<InstalledLibrary>> {
        if self.fail_list {
            return Err(injected(Path::new("<list>")));
        }
        self.inner.list_installed()
    }

    fn is_writable(&self, location: InstallLocation) -> bool {
        self.inner.is_writable(location)
    }

    fn target_path(&self, name: &str, location: InstallLocation) -> libman_store::Result<PathBuf> {
        self.inner.target_path(name, location)
    }

    fn install(
        &self,
        release: &LibraryRelease,
        artifact: &Path,
        target: &Path,
    ) -> libman_store::Result<InstalledLibrary> {
        self.log.push(StoreCall::Install {
            library: release.to_string(),
            target: target.to_path_buf(),
        });
        if self.fail_install.contains(&release.name) {
            return Err(injected(target));
        }
        self.inner.install(release, artifact, target)
    }

    fn uninstall(&self, library: &InstalledLibrary) -> libman_store::Result<()> {
        self.log.push(StoreCall::Uninstall {
            library: library.to_string(),
        });
        if self.fail_uninstall.contains(&library.name) {
            return Err(injected(&library.path));
        }
        self.inner.uninstall(library)
    }

    fn install_archive(
        &self,
        archive: &Path,
        overwrite: bool,
    ) -> libman_store::Result<InstalledLibrary> {
        self.log.push(StoreCall::InstallArchive {
            path: archive.to_path_buf(),
            overwrite,
        });
        self.inner.install_archive(archive, overwrite)
    }

    fn install_from_git(&self, url: &str, overwrite: bool) -> libman_store::Result<InstalledLibrary> {
        self.log.push(StoreCall::InstallFromGit {
            url: url.to_string(),
            overwrite,
        });
        self.inner.install_from_git(url, overwrite)
    }
}
