//! Encoded image payloads and object naming

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mime::Mime;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{StorageError, StorageResult};

/// Characters left untouched when escaping a stored object path: RFC 3986
/// unreserved characters plus the sub-delimiters and `:@` allowed in a path.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Decoded image with its declared media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Media type from the payload header
    pub mime: Mime,
}

impl ImagePayload {
    /// Decodes a `data:<mime>;base64,<data>` payload
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPayload` if the header is missing or
    /// malformed, or the data is not valid standard base64
    pub fn decode(encoded: &str) -> StorageResult<Self> {
        let (header, data) = encoded.split_once(',').ok_or_else(|| {
            StorageError::InvalidPayload("missing ',' between header and data".to_string())
        })?;

        let mime = parse_header(header)?;
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| StorageError::InvalidPayload(format!("invalid base64 data: {e}")))?;

        Ok(Self { bytes, mime })
    }

    /// File extension derived from the media subtype, e.g. `.png`
    #[must_use]
    pub fn extension(&self) -> String {
        format!(".{}", self.mime.subtype())
    }

    /// Content type recorded on the stored object
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.mime.essence_str()
    }
}

fn parse_header(header: &str) -> StorageResult<Mime> {
    // data:image/png;base64
    let media = header.split(';').next().unwrap_or_default();
    let (_, media_type) = media.split_once(':').ok_or_else(|| {
        StorageError::InvalidPayload(format!("missing media type in header {header:?}"))
    })?;

    media_type
        .parse::<Mime>()
        .map_err(|e| StorageError::InvalidPayload(format!("invalid media type {media_type:?}: {e}")))
}

/// Unique object name for an uploaded image
///
/// `{folder}/{entity}-{unix_seconds}{extension}`
#[must_use]
pub fn object_name(folder_name: &str, entity_name: &str, unix_seconds: i64, extension: &str) -> String {
    format!("{folder_name}/{entity_name}-{unix_seconds}{extension}")
}

/// Percent-encodes an object name for use as a URL path
///
/// Separators and path-safe punctuation are kept.
#[must_use]
pub fn escape_object_path(name: &str) -> String {
    utf8_percent_encode(name, PATH_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // 1x1 transparent PNG
    const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    #[test]
    fn test_decode_png_data_uri() {
        let payload = ImagePayload::decode(PNG_DATA_URI).expect("Failed to decode");

        assert_eq!(payload.mime, mime::IMAGE_PNG);
        assert_eq!(payload.extension(), ".png");
        assert_eq!(payload.content_type(), "image/png");
        assert_eq!(&payload.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_decode_jpeg_extension() {
        let payload = ImagePayload::decode("data:image/jpeg;base64,/9j/4AAQ").expect("Failed to decode");

        assert_eq!(payload.extension(), ".jpeg");
        assert_eq!(payload.bytes, vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10]);
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        let cases = [
            "iVBORw0KGgo",
            "image/png;base64,iVBORw0KGgo=",
            "data:png;base64,iVBORw0KGgo=",
            "data:image/png;base64,not base64!",
        ];

        for case in cases {
            assert!(
                matches!(ImagePayload::decode(case), Err(StorageError::InvalidPayload(_))),
                "expected {case:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_object_name() {
        assert_eq!(
            object_name("secure/avatars", "user-42", 1_700_000_000, ".png"),
            "secure/avatars/user-42-1700000000.png"
        );
    }

    #[test]
    fn test_escape_object_path() {
        assert_eq!(
            escape_object_path("secure/avatars/user-42-1700000000.png"),
            "secure/avatars/user-42-1700000000.png"
        );
        assert_eq!(
            escape_object_path("assets/summer sale/banner #1.png"),
            "assets/summer%20sale/banner%20%231.png"
        );
        assert_eq!(escape_object_path("a/b=c;d@e.png"), "a/b=c;d@e.png");
        assert_eq!(
            escape_object_path("assets/banner!(1)*'final'.png"),
            "assets/banner!(1)*'final'.png"
        );
        assert_eq!(escape_object_path("avatars/émile.png"), "avatars/%C3%A9mile.png");
    }
}
