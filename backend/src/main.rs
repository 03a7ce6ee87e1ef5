use std::sync::Arc;

use backend::{server, types::Environment};
use bucket_router::{provider::S3Provider, BucketConfig, ObjectRouter};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env()?;

    // Configure logging format based on environment
    // Use JSON format for staging/production, regular format for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    let bucket_config = Arc::new(BucketConfig::from_env().into_config());
    let object_router = Arc::new(ObjectRouter::new(bucket_config, Arc::new(S3Provider)));

    server::start(object_router).await
}
