use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failed operation.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A room field could not be encoded to or decoded from its JSON form.
    #[error("undecodable field `{field}` in room `{room}`")]
    Codec {
        /// Room key the field belongs to.
        room: String,
        /// Name of the offending field.
        field: String,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
