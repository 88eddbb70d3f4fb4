//! The store interface driven by the installer.

use std::path::{Path, PathBuf};

use libman_index::LibraryRelease;

use crate::error::{Error, Result};
use crate::installed::InstalledLibrary;
use crate::location::InstallLocation;

/// Record of what is installed where.
///
/// Queries never mutate; `install`, `uninstall`, `install_archive` and
/// `install_from_git` are the only mutating operations.
pub trait LibraryStore: Send + Sync {
    /// The library called `name` at a concrete location, if any.
    fn installed(&self, name: &str, location: InstallLocation) -> Result<Option<InstalledLibrary>>;

    /// Every installed library across all locations.
    fn list_installed(&self) -> Result<Vec<InstalledLibrary>>;

    /// Whether libraries may be installed into or removed from `location`.
    fn is_writable(&self, location: InstallLocation) -> bool;

    /// Directory a library called `name` is installed into at a concrete location.
    fn target_path(&self, name: &str, location: InstallLocation) -> Result<PathBuf>;

    /// Install a downloaded release artifact into `target`.
    fn install(
        &self,
        release: &LibraryRelease,
        artifact: &Path,
        target: &Path,
    ) -> Result<InstalledLibrary>;

    /// Remove an installed library.
    fn uninstall(&self, library: &InstalledLibrary) -> Result<()>;

    /// Install the single library contained in a local archive.
    fn install_archive(&self, archive: &Path, overwrite: bool) -> Result<InstalledLibrary>;

    /// Install the library checked out from a version-control URL (`url#ref` selects a ref).
    fn install_from_git(&self, url: &str, overwrite: bool) -> Result<InstalledLibrary>;

    /// Turn `location` into a concrete one for `name`.
    ///
    /// [`InstallLocation::AnyWritable`] picks the writable location where the
    /// library is already installed, else [`InstallLocation::User`].
    fn resolve_location(&self, name: &str, location: InstallLocation) -> Result<InstallLocation> {
        if location != InstallLocation::AnyWritable {
            return Ok(location);
        }
        for candidate in InstallLocation::CONCRETE {
            if self.is_writable(candidate) && self.installed(name, candidate)?.is_some() {
                return Ok(candidate);
            }
        }
        if self.is_writable(InstallLocation::User) {
            Ok(InstallLocation::User)
        } else {
            Err(Error::LocationNotWritable { location })
        }
    }
}
