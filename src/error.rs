//! Error taxonomy for the quarry session core.
//!
//! Every boundary failure is surfaced as a `CoreError` value to the
//! nearest caller; the core never retries on its own and never panics
//! outside of tests. A stale async result is not an error at all — the
//! resource layer reports it as [`crate::resource::LoadOutcome::Stale`].

use crate::types::StoreId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// An external fetch (listing, storage lookup) failed. Recoverable
    /// by re-triggering with the same or different input.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The backend rejected a buffer registration. The in-memory
    /// selection is left untouched.
    #[error("buffer registration rejected: {0}")]
    Registration(String),

    /// A statement was rejected or failed during execution.
    #[error("query execution failed: {0}")]
    Query(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("storage not found: {0}")]
    StorageNotFound(StoreId),

    #[error("cannot list contents of a file: {0}")]
    NotADirectory(String),

    #[error("home directory not found")]
    HomeDirNotFound,

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
