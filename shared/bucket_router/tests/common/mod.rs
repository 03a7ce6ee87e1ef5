// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use std::sync::Arc;

use bucket_router::{provider::FakeProvider, BucketConfig, FolderList, ObjectRouter};

pub const PRIVATE_BUCKET: &str = "acme-private";
pub const PUBLIC_BUCKET: &str = "acme-public";
pub const PROVIDER_URL: &str = "https://storage.example.com/";
pub const CREDENTIALS: &str = "/etc/storage/credentials.json";

// 1x1 transparent PNG
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Configuration with `secure` as private and `assets` as public folder
pub fn test_config() -> BucketConfig {
    BucketConfig {
        provider_url: PROVIDER_URL.to_string(),
        credentials_file: CREDENTIALS.to_string(),
        private_bucket: PRIVATE_BUCKET.to_string(),
        public_bucket: PUBLIC_BUCKET.to_string(),
        private_folders: FolderList::parse("secure"),
        public_folders: FolderList::parse("assets"),
    }
}

/// Router over `test_config` backed by the given fake provider
pub fn router_with(provider: &FakeProvider) -> ObjectRouter {
    ObjectRouter::new(Arc::new(test_config()), Arc::new(provider.clone()))
}
