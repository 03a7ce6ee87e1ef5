use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use bucket_router::{ObjectRouter, ResolvedUrl};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::types::AppError;

/// Request body of an image upload
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Encoded image, `data:<mime>;base64,<data>`
    pub image: String,
    /// Folder the image is stored under
    pub folder_name: String,
    /// Prefix of the generated object name
    pub entity_name: String,
}

/// Response body of an image upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// URL-escaped path of the stored object
    pub path: String,
}

/// Stores an encoded image in the bucket its folder resolves to
///
/// # Errors
///
/// Returns an `AppError` if the payload is malformed or the storage
/// provider rejects the write
#[instrument(skip(object_router, payload))]
pub async fn upload_image(
    Extension(object_router): Extension<Arc<ObjectRouter>>,
    Json(payload): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    info!(
        folder_name = %payload.folder_name,
        entity_name = %payload.entity_name,
        "Received upload request"
    );

    let path = object_router
        .upload_image(&payload.image, &payload.folder_name, &payload.entity_name)
        .await?;

    Ok(Json(UploadResponse { path }))
}

/// Query parameters of a URL lookup
#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    /// Object path, or an absolute URL
    pub object_name: String,
}

/// Response body of a URL lookup
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    /// Resolved URL, empty when the object matches no folder list
    pub url: String,
    /// One of `pass_through`, `signed`, `public`, `unclassified`
    pub kind: &'static str,
    /// ISO-8601 UTC expiry of signed URLs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl From<ResolvedUrl> for UrlResponse {
    fn from(resolved: ResolvedUrl) -> Self {
        let kind = resolved.kind();
        let expires_at = match &resolved {
            ResolvedUrl::Signed(signed) => Some(signed.expires_at.to_rfc3339()),
            ResolvedUrl::PassThrough(_) | ResolvedUrl::Public(_) | ResolvedUrl::Unclassified => {
                None
            }
        };

        Self {
            url: resolved.as_str().to_owned(),
            kind,
            expires_at,
        }
    }
}

/// Resolves the URL an object is served from
///
/// # Errors
///
/// Returns an `AppError` if a signed URL cannot be generated
#[instrument(skip(object_router))]
pub async fn resolve_image_url(
    Extension(object_router): Extension<Arc<ObjectRouter>>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<UrlResponse>, AppError> {
    let resolved = object_router.resolve_url(&query.object_name).await?;

    Ok(Json(resolved.into()))
}
