//! The remote object store contract.
//!
//! [`AsyncObjectStore`] is everything the strategies and map views consume.
//! Request signing, retries, and response decoding live behind it in the
//! provider implementation.
//!
//! # Listing contract
//!
//! Every provider lists keys in ascending order and:
//!
//! - keeps only keys starting with [`ListRequest::prefix`], skipping the key
//!   equal to the prefix itself (the directory marker);
//! - when [`ListRequest::recursive`] is `false`, collapses keys containing
//!   [`DELIMITER`](ruststack_blobstore_model::DELIMITER) after the prefix
//!   into one [`StorageType::RelativePath`](ruststack_blobstore_model::StorageType)
//!   entry per distinct first segment;
//! - reports keys ending in the delimiter as pseudo-directories;
//! - counts objects and pseudo-directories toward
//!   [`ListRequest::max_results`];
//! - returns a next marker only when more entries remain, resuming strictly
//!   after everything already returned.

use async_trait::async_trait;
use ruststack_blobstore_model::{Blob, BlobMetadata, ListRequest, PageSet};

use crate::error::BlobStoreResult;

/// Asynchronous, paginated key/object store.
///
/// The trait is object-safe so views can hold an `Arc<dyn AsyncObjectStore>`.
#[async_trait]
pub trait AsyncObjectStore: Send + Sync + std::fmt::Debug {
    /// Create a container. Returns `false` if it already existed.
    async fn create_container(&self, container: &str) -> BlobStoreResult<bool>;

    /// Whether the container exists.
    async fn container_exists(&self, container: &str) -> BlobStoreResult<bool>;

    /// Whether an object exists under `key`.
    async fn blob_exists(&self, container: &str, key: &str) -> BlobStoreResult<bool>;

    /// Metadata of the object under `key`, without its payload.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::KeyNotFound`](crate::error::BlobStoreError::KeyNotFound)
    /// if the key does not exist.
    async fn blob_metadata(&self, container: &str, key: &str) -> BlobStoreResult<BlobMetadata>;

    /// Read the object under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::KeyNotFound`](crate::error::BlobStoreError::KeyNotFound)
    /// if the key does not exist.
    async fn get_blob(&self, container: &str, key: &str) -> BlobStoreResult<Blob>;

    /// Write `blob` under its name and return the entity tag.
    ///
    /// # Errors
    ///
    /// Create-only providers return
    /// [`BlobStoreError::KeyAlreadyExists`](crate::error::BlobStoreError::KeyAlreadyExists)
    /// when the name is taken.
    async fn put_blob(&self, container: &str, blob: Blob) -> BlobStoreResult<String>;

    /// Delete the object under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::KeyNotFound`](crate::error::BlobStoreError::KeyNotFound)
    /// if the key does not exist.
    async fn remove_blob(&self, container: &str, key: &str) -> BlobStoreResult<()>;

    /// Fetch one page of metadata.
    async fn list(
        &self,
        container: &str,
        request: &ListRequest,
    ) -> BlobStoreResult<PageSet<BlobMetadata>>;

    /// Materialise a pseudo-directory by writing its marker object.
    async fn create_directory(&self, container: &str, dir: &str) -> BlobStoreResult<()> {
        self.put_blob(container, Blob::directory_marker(dir))
            .await
            .map(|_| ())
    }
}
