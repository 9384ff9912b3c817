/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// State file could not be read or written
    #[error("State file error at {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Lock poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<StorageError> for mixtape_core::CoreError {
    fn from(err: StorageError) -> Self {
        mixtape_core::CoreError::storage(err.to_string())
    }
}
