//! Error types for patchstat-db

use patchstat_core::CoreError;

/// Errors raised while reading, populating, or writing the commit cache
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Failed to replace cache file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Cache format version {found} does not match expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error(transparent)]
    Source(#[from] CoreError),
}
