//! Universal error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bucket_router::StorageError;
use serde::Serialize;

/// API error response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Whether the client should retry the request
    pub allow_retry: bool,
    /// Error details
    error: ErrorBody,
}

/// Error body containing code and message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: &'static str,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(
        status: StatusCode,
        code: &'static str,
        msg: &'static str,
        retry: bool,
    ) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                allow_retry: retry,
                error: ErrorBody { code, message: msg },
            },
        }
    }

    /// HTTP status of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.inner.error.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert storage errors to application errors
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::InvalidPayload(msg) => {
                tracing::warn!("Invalid image payload: {msg}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "invalid_input",
                    "Invalid image payload",
                    false,
                )
            }
            StorageError::ProviderConnection(source) => {
                tracing::error!("Storage provider connection error: {source}");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "provider_unavailable",
                    "Storage provider unavailable",
                    true,
                )
            }
            StorageError::ObjectWrite(source) => {
                tracing::error!("Object write error: {source}");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "upload_failed",
                    "Upload image to storage failed",
                    true,
                )
            }
            StorageError::SignedUrlGenerationFailed { bucket, source } => {
                tracing::error!("Signed URL generation failed for bucket {bucket}: {source}");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "signed_url_failed",
                    "Signed URL generation failed",
                    true,
                )
            }
        }
    }
}
