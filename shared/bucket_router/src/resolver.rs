//! Bucket and URL resolution for folders and objects

use tracing::debug;

use crate::{
    classifier::{classify, directory_of, Classification},
    config::BucketConfig,
    provider::SignedUrl,
};

/// URL schemes treated as already-resolved object locations
const ABSOLUTE_URL_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Bucket a folder is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBucket<'a> {
    /// Folder matched the private list
    Private(&'a str),
    /// Folder matched the public list
    Public(&'a str),
    /// Folder matched neither list and falls back to the public bucket
    DefaultedToPublic(&'a str),
}

impl<'a> ResolvedBucket<'a> {
    /// Bucket identifier to write into
    #[must_use]
    pub const fn bucket(&self) -> &'a str {
        match *self {
            Self::Private(bucket) | Self::Public(bucket) | Self::DefaultedToPublic(bucket) => {
                bucket
            }
        }
    }

    /// Classification that led to this bucket
    #[must_use]
    pub const fn classification(&self) -> Classification {
        match self {
            Self::Private(_) => Classification::Private,
            Self::Public(_) => Classification::Public,
            Self::DefaultedToPublic(_) => Classification::Unclassified,
        }
    }
}

/// Maps a folder name to the bucket it is stored in
///
/// The folder and its parent are checked against the private list first,
/// then the public list. Folders matching neither go to the public bucket.
#[must_use]
pub fn resolve_bucket<'a>(folder_name: &str, config: &'a BucketConfig) -> ResolvedBucket<'a> {
    let parent = directory_of(folder_name);

    match classify(folder_name, &parent, config) {
        Classification::Private => ResolvedBucket::Private(&config.private_bucket),
        Classification::Public => ResolvedBucket::Public(&config.public_bucket),
        Classification::Unclassified => {
            debug!(folder_name, "Folder matches no folder list, defaulting to public bucket");
            ResolvedBucket::DefaultedToPublic(&config.public_bucket)
        }
    }
}

/// How an object name is turned into a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectTarget {
    /// Already an absolute URL, returned untouched
    AbsoluteUrl,
    /// Private object, needs a signed URL
    Private,
    /// Public object, addressed directly
    Public,
    /// Matches no folder list
    Unclassified,
}

/// Returns true for values starting with an `http://` or `https://` scheme
/// (scheme compared case-insensitively)
#[must_use]
pub fn is_absolute_url(object_name: &str) -> bool {
    ABSOLUTE_URL_SCHEMES.iter().any(|scheme| {
        object_name
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Decides which URL strategy applies to an object
///
/// The object's directory and that directory's parent are classified.
#[must_use]
pub fn classify_object(object_name: &str, config: &BucketConfig) -> ObjectTarget {
    if is_absolute_url(object_name) {
        return ObjectTarget::AbsoluteUrl;
    }

    let dir_name = directory_of(object_name);
    let parent = directory_of(&dir_name);

    match classify(&dir_name, &parent, config) {
        Classification::Private => ObjectTarget::Private,
        Classification::Public => ObjectTarget::Public,
        Classification::Unclassified => ObjectTarget::Unclassified,
    }
}

/// Static URL of an object in the public bucket
#[must_use]
pub fn public_object_url(object_name: &str, config: &BucketConfig) -> String {
    format!(
        "{}{}/{}",
        config.provider_url, config.public_bucket, object_name
    )
}

/// URL resolved for an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedUrl {
    /// Input was already an absolute URL
    PassThrough(String),
    /// Time-limited URL into the private bucket
    Signed(SignedUrl),
    /// Direct URL into the public bucket
    Public(String),
    /// Object matched no folder list, rendered as an empty string
    Unclassified,
}

impl ResolvedUrl {
    /// URL text. Empty for [`ResolvedUrl::Unclassified`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PassThrough(url) | Self::Public(url) => url,
            Self::Signed(signed) => &signed.url,
            Self::Unclassified => "",
        }
    }

    /// Short machine-readable name of the variant
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PassThrough(_) => "pass_through",
            Self::Signed(_) => "signed",
            Self::Public(_) => "public",
            Self::Unclassified => "unclassified",
        }
    }
}
