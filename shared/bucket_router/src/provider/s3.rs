//! S3-compatible storage provider

use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion};
use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client as S3Client,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::{
    ProviderError, ProviderResult, SignedUrl, SignedUrlOptions, SigningMethod, StorageConnection,
    StorageProvider, StoredObject,
};

const DEFAULT_REGION: &str = "us-east-1";
const CREDENTIALS_PROVIDER_NAME: &str = "bucket-router-credentials-file";

/// Contents of the JSON credentials file referenced by the configuration
#[derive(Debug, Clone, Deserialize)]
pub struct S3Credentials {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<String>,
    /// Signing region, defaults to `us-east-1`
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for S3-compatible stores and `LocalStack`
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Address buckets by path instead of virtual host
    #[serde(default)]
    pub force_path_style: bool,
}

impl S3Credentials {
    /// Reads and parses a credentials file
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::CredentialsUnreadable` if the file cannot be read
    /// Returns `ProviderError::CredentialsInvalid` if the file is not valid JSON credentials
    pub async fn from_file(path: &str) -> ProviderResult<Self> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|source| ProviderError::CredentialsUnreadable {
                path: path.to_owned(),
                source,
            })?;

        serde_json::from_slice(&raw).map_err(|source| ProviderError::CredentialsInvalid {
            path: path.to_owned(),
            source,
        })
    }

    /// S3 client configuration authenticated with these credentials
    ///
    /// SDK retries are disabled: a failed request surfaces on the first
    /// attempt.
    #[must_use]
    pub fn client_config(&self) -> aws_sdk_s3::Config {
        let credentials = Credentials::new(
            &self.access_key_id,
            &self.secret_access_key,
            self.session_token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        let region = self
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_owned());

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .force_path_style(self.force_path_style);

        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        builder.build()
    }
}

/// Storage provider backed by an S3-compatible object store
///
/// Each connection builds its own client from the credentials file.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Provider;

#[async_trait]
impl StorageProvider for S3Provider {
    async fn connect(&self, credentials: &str) -> ProviderResult<Box<dyn StorageConnection>> {
        let credentials = S3Credentials::from_file(credentials).await?;
        let client = S3Client::from_conf(credentials.client_config());

        debug!(
            endpoint_url = credentials.endpoint_url.as_deref().unwrap_or("default"),
            "Opened S3 connection"
        );

        Ok(Box::new(S3Connection { client }))
    }
}

/// S3 client scoped to a single provider call
struct S3Connection {
    client: S3Client,
}

#[async_trait]
impl StorageConnection for S3Connection {
    async fn write_object(
        &self,
        bucket: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> ProviderResult<StoredObject> {
        let content_length = body.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(name)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await?;

        info!(bucket, name, content_length, "Wrote object");

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
        let presigned_config = PresigningConfig::expires_in(options.expires_in).map_err(|e| {
            ProviderError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned_request = match options.method {
            SigningMethod::Get => self
                .client
                .get_object()
                .bucket(bucket)
                .key(name)
                .presigned(presigned_config)
                .await
                .map_err(|e| {
                    ProviderError::S3Error(format!("Failed to generate presigned URL: {e}"))
                })?,
        };

        let expires_at: DateTime<Utc> = Utc::now() + options.expires_in;

        debug!(bucket, name, %expires_at, "Generated presigned URL");

        Ok(SignedUrl {
            url: presigned_request.uri().to_string(),
            expires_at,
        })
    }

    async fn close(self: Box<Self>) -> ProviderResult<()> {
        drop(self.client);
        debug!("Closed S3 connection");
        Ok(())
    }
}
