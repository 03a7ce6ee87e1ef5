//! Error types for storage provider operations

use aws_sdk_s3::{error::SdkError, operation::put_object::PutObjectError};
use thiserror::Error;

/// Result type for storage provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while talking to the storage provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Credentials file could not be read
    #[error("Failed to read credentials file {path:?}: {source}")]
    CredentialsUnreadable {
        /// Configured credentials path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Credentials file is not valid
    #[error("Invalid credentials file {path:?}: {source}")]
    CredentialsInvalid {
        /// Configured credentials path
        path: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<SdkError<PutObjectError>> for ProviderError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        Self::S3Error(error.to_string())
    }
}
