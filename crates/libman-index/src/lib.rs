//! Library catalog for libman.
//!
//! This crate provides the read-only view of known library releases:
//! version requirements, release metadata, and the JSON-backed
//! [`LibraryIndex`] implementing the [`Catalog`] lookup trait.

pub mod error;
pub mod index;
pub mod release;
pub mod version;

/// The canonical filename of a library index.
pub const INDEX_FILENAME: &str = "library_index.json";

pub use error::{Error, Result};
pub use index::{Catalog, LibraryIndex};
pub use release::{LibraryIdentity, LibraryRelease};
pub use version::{VersionConstraint, VersionRequirement, normalize_version};
