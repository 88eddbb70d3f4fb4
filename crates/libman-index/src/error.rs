/// Errors that can occur while reading or querying the library catalog.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No library with this name is known to the catalog.
    #[error("library {name} not found")]
    LibraryNotFound { name: String },

    /// The library is known but no release satisfies the requirement.
    #[error("release {name}@{requirement} not found")]
    ReleaseNotFound { name: String, requirement: String },

    /// Invalid version string.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Invalid version requirement string.
    #[error("invalid version requirement '{constraint}': {reason}")]
    VersionConstraintParse { constraint: String, reason: String },

    /// The index file could not be read or parsed.
    #[error(transparent)]
    Load(#[from] libman_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
