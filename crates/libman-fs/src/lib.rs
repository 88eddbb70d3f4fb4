//! Filesystem helpers for libman
//!
//! Provides atomic locked writes, checksum verification, library directory
//! naming and format-aware configuration loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{is_within, sanitize_name};
