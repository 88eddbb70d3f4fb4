use std::path::PathBuf;

use semver::Version;

use crate::location::InstallLocation;

/// A library physically present in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledLibrary {
    pub name: String,
    pub version: Version,
    /// Always a concrete location.
    pub location: InstallLocation,
    /// The library's own directory.
    pub path: PathBuf,
}

impl std::fmt::Display for InstalledLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
