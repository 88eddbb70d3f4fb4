//! Error types for libman-core

use std::path::PathBuf;

use libman_store::InstallLocation;
use semver::Version;

/// Result type for libman-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ResolutionConflict,
    CatalogLookupFailure,
    PlanningConflict,
    InstallFailure,
    SessionRefreshFailure,
    AlternateSourceConflict,
    Cancelled,
    Internal,
}

/// The step of a library install that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallStep {
    Download,
    /// Removing the version being replaced.
    RemoveOld,
    Install,
}

impl InstallStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::RemoveOld => "remove-old",
            Self::Install => "install",
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::RemoveOld => "remove the old version of",
            Self::Install => "install",
        }
    }
}

impl std::fmt::Display for InstallStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while installing libraries
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two different versions of one library are required
    #[error("two different versions of the library {library} are required: {first} and {second}")]
    DependencyConflict {
        library: String,
        first: Version,
        second: Version,
    },

    #[error("library {name} not found")]
    LibraryNotFound { name: String },

    #[error("release {name}@{requirement} not found")]
    ReleaseNotFound { name: String, requirement: String },

    /// A different version is installed and overwriting was refused
    #[error(
        "library {library}@{installed} is already installed, but {library}@{requested} was requested"
    )]
    AlreadyInstalled {
        library: String,
        installed: Version,
        requested: Version,
    },

    #[error("install location {location} is not writable")]
    LocationNotWritable { location: InstallLocation },

    /// The target directory exists but holds no recognisable library
    #[error("destination directory {path} already exists and is not a library")]
    TargetOccupied { path: PathBuf },

    #[error("library {library} is installed more than once: {paths:?}")]
    MultipleInstalls { library: String, paths: Vec<PathBuf> },

    #[error("failed to {} {library}: {source}", .step.action())]
    InstallFailed {
        library: String,
        step: InstallStep,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to refresh installed libraries: {source}")]
    SessionRefresh {
        #[source]
        source: Box<Error>,
    },

    /// An alternate-source install would overwrite a library without permission
    #[error("library {library} is already installed, use overwrite to replace it")]
    AlternateSourceConflict { library: String },

    #[error("installation cancelled")]
    Cancelled,

    #[error(transparent)]
    Config(#[from] libman_fs::Error),

    #[error(transparent)]
    Index(libman_index::Error),

    #[error(transparent)]
    Store(libman_store::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DependencyConflict { .. } => ErrorKind::ResolutionConflict,
            Self::LibraryNotFound { .. } | Self::ReleaseNotFound { .. } => {
                ErrorKind::CatalogLookupFailure
            }
            Self::AlreadyInstalled { .. }
            | Self::LocationNotWritable { .. }
            | Self::TargetOccupied { .. }
            | Self::MultipleInstalls { .. } => ErrorKind::PlanningConflict,
            Self::InstallFailed { .. } => ErrorKind::InstallFailure,
            Self::SessionRefresh { .. } => ErrorKind::SessionRefreshFailure,
            Self::AlternateSourceConflict { .. } => ErrorKind::AlternateSourceConflict,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config(_) | Self::Index(_) | Self::Store(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn install_failed(
        library: impl ToString,
        step: InstallStep,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InstallFailed {
            library: library.to_string(),
            step,
            source: Box::new(source),
        }
    }
}

impl From<libman_index::Error> for Error {
    fn from(err: libman_index::Error) -> Self {
        match err {
            libman_index::Error::LibraryNotFound { name } => Self::LibraryNotFound { name },
            libman_index::Error::ReleaseNotFound { name, requirement } => {
                Self::ReleaseNotFound { name, requirement }
            }
            other => Self::Index(other),
        }
    }
}

impl From<libman_store::Error> for Error {
    fn from(err: libman_store::Error) -> Self {
        match err {
            libman_store::Error::LocationNotWritable { location } => {
                Self::LocationNotWritable { location }
            }
            libman_store::Error::MultipleInstalls { name, paths } => Self::MultipleInstalls {
                library: name,
                paths,
            },
            libman_store::Error::TargetExists { path } => Self::TargetOccupied { path },
            libman_store::Error::AlreadyInstalled { name, .. } => {
                Self::AlternateSourceConflict { library: name }
            }
            other => Self::Store(other),
        }
    }
}
