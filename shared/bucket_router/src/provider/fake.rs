//! In-memory storage provider for tests

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, PoisonError,
};

use async_trait::async_trait;
use chrono::Utc;

use super::{
    ProviderError, ProviderResult, SignedUrl, SignedUrlOptions, StorageConnection,
    StorageProvider, StoredObject,
};

/// Host used in signed URLs produced by [`FakeProvider`]
pub const FAKE_SIGNING_HOST: &str = "https://signed.test";

/// Failure injected into a [`FakeProvider`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    /// Connecting fails
    Connect,
    /// Writing objects fails
    Write,
    /// Signing URLs fails
    Sign,
}

/// Object recorded by a [`FakeProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenObject {
    /// Target bucket
    pub bucket: String,
    /// Object name
    pub name: String,
    /// Declared content type
    pub content_type: String,
    /// Object bytes
    pub body: Vec<u8>,
}

#[derive(Debug, Default)]
struct FakeState {
    connects: AtomicUsize,
    closes: AtomicUsize,
    credentials: Mutex<Vec<String>>,
    written: Mutex<Vec<WrittenObject>>,
}

/// Storage provider that keeps objects in memory and records every call
///
/// Clones share the same recorded state.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    failure: Option<FakeFailure>,
    state: Arc<FakeState>,
}

impl FakeProvider {
    /// Provider where every operation succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider failing at the given step
    #[must_use]
    pub fn failing(failure: FakeFailure) -> Self {
        Self {
            failure: Some(failure),
            state: Arc::default(),
        }
    }

    /// Number of successfully opened connections
    #[must_use]
    pub fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    /// Number of released connections
    #[must_use]
    pub fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    /// Credential references passed to `connect`, in call order
    #[must_use]
    pub fn credentials_seen(&self) -> Vec<String> {
        self.state
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Objects written so far
    #[must_use]
    pub fn written(&self) -> Vec<WrittenObject> {
        self.state
            .written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn fails_at(&self, step: FakeFailure) -> bool {
        self.failure == Some(step)
    }
}

#[async_trait]
impl StorageProvider for FakeProvider {
    async fn connect(&self, credentials: &str) -> ProviderResult<Box<dyn StorageConnection>> {
        self.state
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(credentials.to_owned());

        if self.fails_at(FakeFailure::Connect) {
            return Err(ProviderError::CredentialsUnreadable {
                path: credentials.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            provider: self.clone(),
        }))
    }
}

struct FakeConnection {
    provider: FakeProvider,
}

#[async_trait]
impl StorageConnection for FakeConnection {
    async fn write_object(
        &self,
        bucket: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> ProviderResult<StoredObject> {
        if self.provider.fails_at(FakeFailure::Write) {
            return Err(ProviderError::S3Error("connection reset by peer".to_owned()));
        }

        self.provider
            .state
            .written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(WrittenObject {
                bucket: bucket.to_owned(),
                name: name.to_owned(),
                content_type: content_type.to_owned(),
                body,
            });

        Ok(StoredObject {
            bucket: bucket.to_owned(),
            name: name.to_owned(),
        })
    }

    async fn signed_url(
        &self,
        bucket: &str,
        name: &str,
        options: SignedUrlOptions,
    ) -> ProviderResult<SignedUrl> {
        if self.provider.fails_at(FakeFailure::Sign) {
            return Err(ProviderError::S3Error("signature rejected".to_owned()));
        }

        Ok(SignedUrl {
            url: format!(
                "{FAKE_SIGNING_HOST}/{bucket}/{name}?method={:?}&expires={}",
                options.method,
                options.expires_in.as_secs()
            ),
            expires_at: Utc::now() + options.expires_in,
        })
    }

    async fn close(self: Box<Self>) -> ProviderResult<()> {
        self.provider.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
