//! Error types for libman-store

use std::path::PathBuf;

use crate::location::InstallLocation;

/// Result type for libman-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A library with this name is already installed and overwrite was not allowed
    #[error("library {name} is already installed at {path}")]
    AlreadyInstalled { name: String, path: PathBuf },

    /// The destination directory exists but is not the library being replaced
    #[error("destination directory {path} already exists, cannot install")]
    TargetExists { path: PathBuf },

    /// More than one directory in a location claims the same library name
    #[error("library {name} is installed more than once: {paths:?}")]
    MultipleInstalls { name: String, paths: Vec<PathBuf> },

    /// Refused to touch a path outside every install location
    #[error("path {path} is outside the library store")]
    OutsideStore { path: PathBuf },

    #[error("install location {location} is not writable")]
    LocationNotWritable { location: InstallLocation },

    /// Library directory without a readable `library.toml`
    #[error("no library metadata found in {path}")]
    MetadataMissing { path: PathBuf },

    #[error("unsupported archive format: {path}")]
    UnsupportedArchive { path: PathBuf },

    #[error("failed to extract {archive}: {message}")]
    Extract { archive: PathBuf, message: String },

    #[error("failed to clone {url}: {message}")]
    GitClone { url: String, message: String },

    #[error("invalid install location '{0}', expected user, builtin or any")]
    InvalidLocation(String),

    #[error(transparent)]
    Fs(#[from] libman_fs::Error),

    #[error(transparent)]
    Index(#[from] libman_index::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs(libman_fs::Error::io(path, source))
    }
}
