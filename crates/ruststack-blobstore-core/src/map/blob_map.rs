//! View whose values are whole blobs.

use bytes::Bytes;
use ruststack_blobstore_model::Blob;

use crate::map::BaseBlobMap;

/// Map from relative key to [`Blob`].
///
/// Blobs come back under their full key; a blob passed to `put` is renamed
/// to the full key of the entry.
pub type BlobMap = BaseBlobMap<Blob>;

impl BaseBlobMap<Blob> {
    /// Build a blob named after the full key of `key` in this view.
    #[must_use]
    pub fn new_blob(&self, key: &str, payload: impl Into<Bytes>) -> Blob {
        Blob::new(self.options().full_key(key), payload)
    }
}
