//! Shared test utilities for the libman workspace.
//!
//! Dev-dependency only, never published. Use it from `tests/` directories:
//! unit tests inside a crate that this one depends on would see two copies
//! of that crate's types.
//!
//! # Modules
//!
//! - [`archive`] - `.tar.gz` library archives and `library.toml` content
//! - [`catalog`] - catalog builders backed by real archives, lookup counting
//! - [`git`] - library repositories with history and tags
//! - [`store`] - [`TestStore`] directories and a mutation-recording store

pub mod archive;
pub mod catalog;
pub mod git;
pub mod store;

pub use archive::{library_toml, write_archive, write_library_archive};
pub use catalog::{CatalogBuilder, CountingCatalog};
pub use store::{CallLog, RecordingStore, StoreCall, TestStore};
