//! A catalog, a store and a download cache opened together.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use libman_index::{Catalog, LibraryIndex};
use libman_store::{FsLibraryStore, InstalledLibrary, LibraryStore};

use crate::config::Settings;
use crate::download::DownloadCache;
use crate::error::Result;

/// Everything an install operation works against.
///
/// The session keeps a view of the installed libraries that is rebuilt by
/// [`Session::reinitialize`]; resolved installs refresh it once per batch.
/// Install operations on one session are serialized.
pub struct Session {
    catalog: Box<dyn Catalog>,
    store: Box<dyn LibraryStore>,
    downloads: DownloadCache,
    install_lock: Mutex<()>,
    installed: RwLock<Vec<InstalledLibrary>>,
}

impl Session {
    /// Create a session. The installed view stays empty until the first
    /// [`reinitialize`](Self::reinitialize).
    pub fn new(
        catalog: impl Catalog + 'static,
        store: impl LibraryStore + 'static,
        downloads: DownloadCache,
    ) -> Self {
        Self {
            catalog: Box::new(catalog),
            store: Box::new(store),
            downloads,
            install_lock: Mutex::new(()),
            installed: RwLock::new(Vec::new()),
        }
    }

    /// Open the index, store and download cache named by `settings`.
    pub fn open(settings: &Settings) -> Result<Self> {
        let index = LibraryIndex::load(&settings.library.index)?;
        let store = FsLibraryStore::new(settings.layout());
        let session = Self::new(
            index,
            store,
            DownloadCache::new(&settings.directories.downloads),
        );
        session.reinitialize()?;
        Ok(session)
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn store(&self) -> &dyn LibraryStore {
        self.store.as_ref()
    }

    pub fn downloads(&self) -> &DownloadCache {
        &self.downloads
    }

    /// Installed libraries as of the last refresh.
    pub fn installed_libraries(&self) -> Vec<InstalledLibrary> {
        self.installed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rescan the store and replace the installed view.
    pub fn reinitialize(&self) -> Result<()> {
        let libraries = self.store.list_installed()?;
        tracing::debug!(count = libraries.len(), "Refreshed installed libraries");
        *self.installed.write().unwrap_or_else(PoisonError::into_inner) = libraries;
        Ok(())
    }

    /// Held for the duration of an install operation.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.install_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("downloads", &self.downloads.dir())
            .finish_non_exhaustive()
    }
}
