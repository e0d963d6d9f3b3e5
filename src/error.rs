//! Service-layer error types.

use thiserror::Error;

use crate::dao::storage::StorageError;

/// Errors surfaced by action processing.
///
/// Store loss is fatal to the affected action: the caller closes the
/// connection rather than leaving the client hanging. No automatic retry
/// happens at this layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The room store failed mid-operation.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// No room store is installed (degraded mode).
    #[error("storage unavailable (degraded mode)")]
    Degraded,
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}
