//! Payload hashing.
//!
//! Stores report an MD5 content hash per object; batch strategies use it to
//! rule out candidates without downloading them.

use digest::Digest;

/// Compute the hex-encoded MD5 digest of `data`.
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_core::checksums::compute_md5;
///
/// let digest = compute_md5(b"hello");
/// assert_eq!(digest, "5d41402abc4b2a76b9719d911017c592");
/// ```
#[must_use]
pub fn compute_md5(data: &[u8]) -> String {
    let hash = md5::Md5::digest(data);
    hex::encode(hash)
}

/// Compute the quoted hex-encoded MD5 digest of `data`, suitable for use as
/// an entity tag.
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_core::checksums::compute_etag;
///
/// let etag = compute_etag(b"hello");
/// assert_eq!(etag, "\"5d41402abc4b2a76b9719d911017c592\"");
/// ```
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    let md5_hex = compute_md5(data);
    format!("\"{md5_hex}\"")
}

/// Strip surrounding quotes from an entity tag.
#[must_use]
pub fn unquote_etag(etag: &str) -> &str {
    etag.trim_matches('"')
}
