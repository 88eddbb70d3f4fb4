//! Dependency-aware library installation for libman.
//!
//! A resolved install runs in three phases:
//!
//! 1. [`resolver`] expands the requested library into a conflict-free
//!    [`DependencyClosure`]
//! 2. [`planner`] decides, for every library in the closure, whether it is up
//!    to date, a fresh install or a replacement, before anything is touched
//! 3. [`executor`] downloads and installs the libraries that need it,
//!    dependencies first, streaming progress to the caller
//!
//! [`alternate`] installs straight from a local archive or a git URL, without
//! the catalog.

pub mod alternate;
pub mod config;
pub mod download;
pub mod error;
pub mod executor;
pub mod order;
pub mod planner;
pub mod progress;
pub mod resolver;
pub mod session;

pub use alternate::{
    ArchiveInstallRequest, GitInstallRequest, archive_library_install, git_library_install,
};
pub use config::Settings;
pub use download::{DownloadCache, DownloadError, Fetched, FileTransport, Transport};
pub use error::{Error, ErrorKind, InstallStep, Result};
pub use executor::{InstallReason, LibraryInstallRequest, library_install};
pub use planner::LibraryInstallPlan;
pub use progress::{
    ChannelSink, DownloadProgress, DownloadProgressSink, LogSink, NoopSink, TaskProgress,
    TaskProgressSink,
};
pub use resolver::{DependencyClosure, ResolveOptions, resolve_dependencies};
pub use session::Session;

pub use tokio_util::sync::CancellationToken;
