//! Error types for upload and URL resolution

use thiserror::Error;

use crate::provider::ProviderError;

/// Result type for bucket routing operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced to callers of [`crate::ObjectRouter`]
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage client could not be constructed
    #[error("Upload image to storage failed, provider connection error: {0}")]
    ProviderConnection(#[source] ProviderError),

    /// Bytes could not be written to the bucket
    #[error("Upload image to storage failed: {0}")]
    ObjectWrite(#[source] ProviderError),

    /// Signed URL for a private object could not be produced
    #[error("Signed URL generation failed for bucket {bucket:?}: {source}")]
    SignedUrlGenerationFailed {
        /// Private bucket the URL was requested for
        bucket: String,
        /// Underlying provider error
        #[source]
        source: ProviderError,
    },

    /// Encoded image could not be decoded
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),
}
