//! Routing of object storage operations between a private and a public bucket
//!
//! Folders and objects are classified against two configured folder lists.
//! Private objects are served through short-lived signed URLs, public ones
//! through static URLs.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

pub mod classifier;
pub mod config;
mod error;
pub mod image;
pub mod provider;
pub mod resolver;
mod router;

pub use classifier::{matches, Classification};
pub use config::{BucketConfig, ConfigLoad, ConfigLoadError, FolderList};
pub use error::{StorageError, StorageResult};
pub use resolver::{resolve_bucket, ObjectTarget, ResolvedBucket, ResolvedUrl};
pub use router::ObjectRouter;
