//! Command implementations

mod deps;
mod install;
mod list;
mod progress;

pub use deps::run_deps;
pub use install::run_install;
pub use list::run_list;

use libman_core::{DownloadCache, Session, Settings};
use libman_index::LibraryIndex;
use libman_store::FsLibraryStore;

use crate::error::{CliError, Result};

/// Open a session with the configured library index.
fn open_session(settings: &Settings) -> Result<Session> {
    let index = &settings.library.index;
    if !index.exists() {
        return Err(CliError::user(format!(
            "library index not found at {}; set library.index in the settings file",
            index.display()
        )));
    }
    Ok(Session::open(settings)?)
}

/// Open a session without a catalog, for installs that bypass it.
fn open_uncataloged_session(settings: &Settings) -> Result<Session> {
    let session = Session::new(
        LibraryIndex::new(),
        FsLibraryStore::new(settings.layout()),
        DownloadCache::new(&settings.directories.downloads),
    );
    session.reinitialize()?;
    Ok(session)
}
