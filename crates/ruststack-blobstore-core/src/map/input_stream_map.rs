//! View whose values are raw payload bytes.

use std::path::Path;

use anyhow::Context;
use bytes::Bytes;

use crate::error::BlobStoreResult;
use crate::map::BaseBlobMap;

/// Map from relative key to payload [`Bytes`].
pub type InputStreamMap = BaseBlobMap<Bytes>;

impl BaseBlobMap<Bytes> {
    /// Store a UTF-8 string under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`put`](BaseBlobMap::put).
    pub async fn put_string(&self, key: &str, value: &str) -> BlobStoreResult<Option<Bytes>> {
        self.put(key, Bytes::copy_from_slice(value.as_bytes())).await
    }

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`put`](BaseBlobMap::put).
    pub async fn put_bytes(
        &self,
        key: &str,
        value: impl Into<Bytes>,
    ) -> BlobStoreResult<Option<Bytes>> {
        self.put(key, value.into()).await
    }

    /// Store the contents of the file at `path` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Internal`](crate::error::BlobStoreError::Internal) if the
    /// file cannot be read, otherwise the same as [`put`](BaseBlobMap::put).
    pub async fn put_file(
        &self,
        key: &str,
        path: impl AsRef<Path>,
    ) -> BlobStoreResult<Option<Bytes>> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.put(key, Bytes::from(contents)).await
    }
}
