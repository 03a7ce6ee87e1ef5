//! Upload and URL lookup orchestration

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::{
    config::BucketConfig,
    error::{StorageError, StorageResult},
    image::{escape_object_path, object_name, ImagePayload},
    provider::{
        ProviderError, SignedUrl, SignedUrlOptions, StorageConnection, StorageProvider,
        SIGNED_URL_EXPIRY,
    },
    resolver::{
        classify_object, public_object_url, resolve_bucket, ObjectTarget, ResolvedBucket,
        ResolvedUrl,
    },
};

/// Routes uploads and URL lookups to the private or public bucket
pub struct ObjectRouter {
    config: Arc<BucketConfig>,
    provider: Arc<dyn StorageProvider>,
}

impl ObjectRouter {
    /// Creates a new router
    ///
    /// # Arguments
    ///
    /// * `config` - Bucket configuration, shared read-only
    /// * `provider` - Storage provider used for writes and signed URLs
    #[must_use]
    pub const fn new(config: Arc<BucketConfig>, provider: Arc<dyn StorageProvider>) -> Self {
        Self { config, provider }
    }

    /// Configuration this router resolves against
    #[must_use]
    pub fn config(&self) -> &BucketConfig {
        &self.config
    }

    /// Bucket a folder is written into
    #[must_use]
    pub fn resolve_bucket(&self, folder_name: &str) -> ResolvedBucket<'_> {
        resolve_bucket(folder_name, &self.config)
    }

    /// Resolves the URL an object is reachable at
    ///
    /// Absolute URLs are returned as they are. Private objects get a signed
    /// URL valid for one minute, public objects a static URL. Objects that
    /// match no folder list resolve to [`ResolvedUrl::Unclassified`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError::SignedUrlGenerationFailed` if connecting to the
    /// provider or signing fails for a private object
    pub async fn resolve_url(&self, object_name: &str) -> StorageResult<ResolvedUrl> {
        match classify_object(object_name, &self.config) {
            ObjectTarget::AbsoluteUrl => Ok(ResolvedUrl::PassThrough(object_name.to_owned())),
            ObjectTarget::Private => self
                .private_object_url(object_name)
                .await
                .map(ResolvedUrl::Signed),
            ObjectTarget::Public => Ok(ResolvedUrl::Public(public_object_url(
                object_name,
                &self.config,
            ))),
            ObjectTarget::Unclassified => {
                debug!(object_name, "Object matches no folder list");
                Ok(ResolvedUrl::Unclassified)
            }
        }
    }

    /// Generates a GET signed URL for an object in the private bucket
    ///
    /// A connection is opened for this request and released afterwards,
    /// whether signing succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::SignedUrlGenerationFailed` if connecting or
    /// signing fails
    pub async fn private_object_url(&self, object_name: &str) -> StorageResult<SignedUrl> {
        let bucket = &self.config.private_bucket;
        let failed = |source: ProviderError| {
            error!("Bucket({bucket:?}).SignedURL for {object_name}: {source}");
            StorageError::SignedUrlGenerationFailed {
                bucket: bucket.clone(),
                source,
            }
        };

        let connection = self
            .provider
            .connect(&self.config.credentials_file)
            .await
            .map_err(failed)?;

        let signed = connection
            .signed_url(bucket, object_name, SignedUrlOptions::get(SIGNED_URL_EXPIRY))
            .await;
        release(connection).await;

        signed.map_err(failed)
    }

    /// Uploads an encoded image into the bucket its folder resolves to
    ///
    /// # Arguments
    ///
    /// * `encoded_image` - `data:<mime>;base64,<data>` payload
    /// * `folder_name` - Folder the object is placed in
    /// * `entity_name` - Prefix of the generated object name
    ///
    /// # Returns
    ///
    /// The URL-escaped path of the stored object
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPayload` if the image cannot be decoded
    /// Returns `StorageError::ProviderConnection` if the provider is unreachable
    /// Returns `StorageError::ObjectWrite` if writing the bytes fails
    pub async fn upload_image(
        &self,
        encoded_image: &str,
        folder_name: &str,
        entity_name: &str,
    ) -> StorageResult<String> {
        let bucket = self.resolve_bucket(folder_name);
        let payload = ImagePayload::decode(encoded_image)?;

        let connection = self
            .provider
            .connect(&self.config.credentials_file)
            .await
            .map_err(StorageError::ProviderConnection)?;

        let name = object_name(
            folder_name,
            entity_name,
            Utc::now().timestamp(),
            &payload.extension(),
        );
        let content_type = payload.content_type().to_owned();

        let written = connection
            .write_object(bucket.bucket(), &name, payload.bytes, &content_type)
            .await;
        release(connection).await;

        let stored = written.map_err(StorageError::ObjectWrite)?;
        info!(
            bucket = %stored.bucket,
            name = %stored.name,
            classification = ?bucket.classification(),
            "Uploaded image"
        );

        Ok(escape_object_path(&stored.name))
    }
}

async fn release(connection: Box<dyn StorageConnection>) {
    if let Err(e) = connection.close().await {
        warn!("Failed to close storage connection: {e}");
    }
}
