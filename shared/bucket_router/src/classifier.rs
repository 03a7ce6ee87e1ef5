//! Folder classification against the configured folder lists

use crate::config::BucketConfig;

/// Which folder list a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Matched the private folder list
    Private,
    /// Matched the public folder list only
    Public,
    /// Matched neither list
    Unclassified,
}

/// Returns true if any entry of `haystack` contains `needle` as a substring
///
/// The candidate path is searched for inside each configured pattern, not
/// the other way around: `matches("secure", ["secure/avatars"])` is true
/// while `matches("secure/avatars", ["secure"])` is false. No separator,
/// case or trailing slash normalization happens.
#[must_use]
pub fn matches<S: AsRef<str>>(needle: &str, haystack: &[S]) -> bool {
    haystack.iter().any(|entry| entry.as_ref().contains(needle))
}

/// Classifies a path and its parent directory
///
/// The private list is checked first, so a path matching both lists is
/// private.
#[must_use]
pub fn classify(path: &str, parent: &str, config: &BucketConfig) -> Classification {
    let private = config.private_folders.entries();
    if matches(parent, private) || matches(path, private) {
        return Classification::Private;
    }

    let public = config.public_folders.entries();
    if matches(parent, public) || matches(path, public) {
        return Classification::Public;
    }

    Classification::Unclassified
}

/// Returns the directory part of a slash-separated path
///
/// Everything after the final `/` is dropped and the rest is lexically
/// cleaned. A path without `/` yields `"."`, one directly under the root
/// yields `"/"`.
#[must_use]
pub fn directory_of(path: &str) -> String {
    let head = path.rfind('/').map_or("", |idx| &path[..=idx]);
    clean(head)
}

/// Lexically normalizes a path: repeated separators collapse, `.` segments
/// are dropped and `..` removes the preceding segment where there is one.
fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_owned()
    } else {
        joined
    }
}
