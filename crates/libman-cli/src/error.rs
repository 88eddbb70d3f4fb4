//! Error types for libman-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from libman-core
    #[error(transparent)]
    Core(#[from] libman_core::Error),

    /// Error from libman-index
    #[error(transparent)]
    Index(#[from] libman_index::Error),

    /// Error from libman-store
    #[error(transparent)]
    Store(#[from] libman_store::Error),

    /// Error from libman-fs
    #[error(transparent)]
    Fs(#[from] libman_fs::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
