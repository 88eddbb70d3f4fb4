//! Installs from a local archive or a git URL.
//!
//! These bypass the catalog entirely: no release lookup, no dependency
//! expansion. The library always lands in the user location, named after its
//! own `library.toml`.

use std::path::PathBuf;

use crate::error::{Error, InstallStep, Result};
use crate::progress::{TaskProgress, TaskProgressSink};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInstallRequest {
    pub path: PathBuf,
    /// Replace a library of the same name.
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInstallRequest {
    /// Repository URL, optionally suffixed with `#<tag or branch>`.
    pub url: String,
    /// Replace a library of the same name.
    pub overwrite: bool,
}

/// Install the library contained in a local archive.
pub fn archive_library_install(
    session: &Session,
    request: &ArchiveInstallRequest,
    task_progress: &dyn TaskProgressSink,
) -> Result<()> {
    let _guard = session.lock();
    let installed = session
        .store()
        .install_archive(&request.path, request.overwrite)
        .map_err(|e| install_error(request.path.display(), e))?;
    tracing::info!(library = %installed, archive = %request.path.display(), "Installed library from archive");
    task_progress.on_task(TaskProgress::completed("Library installed"));
    Ok(())
}

/// Install the library checked out from a git repository.
pub fn git_library_install(
    session: &Session,
    request: &GitInstallRequest,
    task_progress: &dyn TaskProgressSink,
) -> Result<()> {
    let _guard = session.lock();
    let installed = session
        .store()
        .install_from_git(&request.url, request.overwrite)
        .map_err(|e| install_error(&request.url, e))?;
    tracing::info!(library = %installed, url = %request.url, "Installed library from git");
    task_progress.on_task(TaskProgress::completed("Library installed"));
    Ok(())
}

/// A name conflict stays a conflict; any other failure is a failed install
/// of `source`, the archive path or repository URL.
fn install_error(source: impl ToString, err: libman_store::Error) -> Error {
    match err {
        libman_store::Error::AlreadyInstalled { name, .. } => {
            Error::AlternateSourceConflict { library: name }
        }
        other => Error::install_failed(source, InstallStep::Install, other),
    }
}
