//! Marker encoding helpers.
//!
//! Providers that paginate by key hand out the last consumed key as an opaque
//! base64 [`Marker`], so callers cannot mistake it for a listable key.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use ruststack_blobstore_model::Marker;

use crate::error::BlobStoreError;

/// Encode a key into an opaque continuation marker.
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_core::utils::{decode_marker, encode_marker};
///
/// let marker = encode_marker("photos/2024/img.jpg");
/// let key = decode_marker(&marker).unwrap();
/// assert_eq!(key, "photos/2024/img.jpg");
/// ```
#[must_use]
pub fn encode_marker(key: &str) -> Marker {
    Marker::new(BASE64_STANDARD.encode(key.as_bytes()))
}

/// Decode a marker produced by [`encode_marker`] back to a key.
///
/// # Errors
///
/// Returns [`BlobStoreError::InvalidArgument`] if the marker is not valid
/// base64 or does not decode to valid UTF-8.
pub fn decode_marker(marker: &Marker) -> Result<String, BlobStoreError> {
    let bytes = BASE64_STANDARD
        .decode(marker.as_str())
        .map_err(|_| BlobStoreError::InvalidArgument {
            message: "Invalid continuation marker".to_owned(),
        })?;
    String::from_utf8(bytes).map_err(|_| BlobStoreError::InvalidArgument {
        message: "Continuation marker contains invalid UTF-8".to_owned(),
    })
}
