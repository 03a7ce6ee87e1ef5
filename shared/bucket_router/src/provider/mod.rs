//! Storage provider boundary
//!
//! The provider is modelled as a capability: open a connection with a
//! credential reference, then write objects or request signed URLs through
//! it. Every connection is released with [`StorageConnection::close`].

mod error;
#[cfg(any(test, feature = "test-utils"))]
mod fake;
mod s3;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use error::{ProviderError, ProviderResult};
#[cfg(any(test, feature = "test-utils"))]
pub use fake::{FakeFailure, FakeProvider, WrittenObject, FAKE_SIGNING_HOST};
pub use s3::{S3Credentials, S3Provider};

/// Validity window of signed URLs handed out for private objects
pub const SIGNED_URL_EXPIRY: Duration = Duration::from_secs(60);

/// HTTP method a signed URL is valid for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMethod {
    /// Download
    Get,
}

/// Parameters of a signed URL request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedUrlOptions {
    /// Method the URL authorizes
    pub method: SigningMethod,
    /// How long the URL stays valid after generation
    pub expires_in: Duration,
}

impl SignedUrlOptions {
    /// Options for a download URL
    #[must_use]
    pub const fn get(expires_in: Duration) -> Self {
        Self {
            method: SigningMethod::Get,
            expires_in,
        }
    }
}

/// Signed URL with expiration information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    /// The signed URL
    pub url: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Object persisted by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Bucket the object was written into
    pub bucket: String,
    /// Object name inside the bucket
    pub name: String,
}

/// Factory for provider connections
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Opens a connection authenticated with the given credential reference
    async fn connect(&self, credentials: &str) -> ProviderResult<Box<dyn StorageConnection>>;
}

/// Open connection to a storage provider
#[async_trait]
pub trait StorageConnection: Send + Sync {
    /// Writes `body` as object `name` in `bucket`
    async fn write_object(
        &self,
        bucket: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> ProviderResult<StoredObject>;

    /// Requests a signed URL for object `name` in `bucket`
    async fn signed_url(
        &self,
        bucket: &str,
        name: &str,
        options: SignedUrlOptions,
    ) -> ProviderResult<SignedUrl>;

    /// Releases the connection
    async fn close(self: Box<Self>) -> ProviderResult<()>;
}
