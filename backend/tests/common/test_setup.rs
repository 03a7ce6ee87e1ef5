use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use backend::server;
use bucket_router::{
    provider::{FakeFailure, FakeProvider},
    BucketConfig, ObjectRouter,
};
use tower::ServiceExt;

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router backed by an in-memory storage provider
pub struct TestSetup {
    pub router: Router,
    pub provider: FakeProvider,
    pub bucket_config: Arc<BucketConfig>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_provider(FakeProvider::new())
    }

    pub fn failing(failure: FakeFailure) -> Self {
        Self::with_provider(FakeProvider::failing(failure))
    }

    fn with_provider(provider: FakeProvider) -> Self {
        setup_test_env();

        let bucket_config = Arc::new(
            BucketConfig::try_from_env().expect("Failed to load bucket config from .env.example"),
        );
        let object_router = Arc::new(ObjectRouter::new(
            bucket_config.clone(),
            Arc::new(provider.clone()),
        ));

        Self {
            router: server::app(object_router),
            provider,
            bucket_config,
        }
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}
