//! Installed-library store for libman.
//!
//! The store is the persisted record of which library is installed where.
//! Each install location is a directory; each installed library is a
//! sub-directory carrying a `library.toml` metadata file.
//!
//! # Architecture
//!
//! - [`LibraryStore`] - the interface the installer drives
//! - [`FsLibraryStore`] - directory-per-library implementation
//! - [`ArchiveExtractor`] - unpacks release and user archives
//! - [`RepositoryCloner`] - checks out libraries from version control

pub mod error;
pub mod extract;
pub mod fs_store;
pub mod git;
pub mod installed;
pub mod location;
pub mod metadata;
pub mod store;

/// The metadata file every installed library directory carries.
pub const METADATA_FILENAME: &str = "library.toml";

pub use error::{Error, Result};
pub use extract::{ArchiveExtractor, FileArchiveExtractor};
pub use fs_store::FsLibraryStore;
pub use git::{GitCloner, RepositoryCloner, split_url_ref};
pub use installed::InstalledLibrary;
pub use location::{InstallLocation, StoreLayout};
pub use metadata::{InstallRecord, LibraryInfo, LibraryMetadata};
pub use store::LibraryStore;
