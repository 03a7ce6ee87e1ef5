//! Bucket router backend service
//!
//! HTTP surface over [`bucket_router`]: image upload into the private or
//! public bucket and URL lookup for stored objects.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// HTTP route handlers
pub mod routes;

/// Server setup and lifecycle
pub mod server;

/// Environment and error types
pub mod types;
