//! In-memory object store.
//!
//! [`TransientBlobStore`] implements [`AsyncObjectStore`] over process memory.
//! It backs tests and local development, and serves as the reference for the
//! listing contract other providers must honour.
//!
//! Containers live in a [`DashMap`]; each container's keys sit behind a
//! `parking_lot` [`RwLock`] over a sorted [`KeyStore`]. No lock is held
//! across an await point.

pub mod keystore;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use ruststack_blobstore_model::{Blob, BlobMetadata, ListRequest, PageSet};
use tracing::{debug, info};
use typed_builder::TypedBuilder;

use crate::error::{BlobStoreError, BlobStoreResult};
use crate::store::AsyncObjectStore;
use crate::utils::{decode_marker, encode_marker};

pub use keystore::KeyStore;

/// In-memory [`AsyncObjectStore`].
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_core::store::AsyncObjectStore;
/// use ruststack_blobstore_core::transient::TransientBlobStore;
/// use ruststack_blobstore_model::Blob;
///
/// # tokio_test::block_on(async {
/// let store = TransientBlobStore::new();
/// store.create_container("photos").await.unwrap();
/// store.put_blob("photos", Blob::new("a.jpg", "bytes")).await.unwrap();
///
/// let blob = store.get_blob("photos", "a.jpg").await.unwrap();
/// assert_eq!(blob.payload.as_ref(), b"bytes");
/// # });
/// ```
#[derive(TypedBuilder)]
pub struct TransientBlobStore {
    #[builder(default, setter(skip))]
    containers: DashMap<String, RwLock<KeyStore>>,
    /// When `false`, writing an existing key fails with
    /// [`BlobStoreError::KeyAlreadyExists`], like create-only providers.
    #[builder(default = true)]
    overwrite: bool,
}

impl std::fmt::Debug for TransientBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransientBlobStore")
            .field("container_count", &self.containers.len())
            .field("overwrite", &self.overwrite)
            .finish()
    }
}

impl Default for TransientBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransientBlobStore {
    /// Create an empty store that overwrites on put.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Names of all containers, sorted.
    #[must_use]
    pub fn container_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.containers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of stored objects in `container`, directory markers included.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::ContainerNotFound`] if the container does not exist.
    pub fn object_count(&self, container: &str) -> BlobStoreResult<usize> {
        self.with_container(container, |keys| keys.len())
    }

    /// Drop every container and object.
    pub fn reset(&self) {
        self.containers.clear();
        info!("transient blob store reset");
    }

    fn with_container<T>(
        &self,
        container: &str,
        f: impl FnOnce(&KeyStore) -> T,
    ) -> BlobStoreResult<T> {
        let entry = self
            .containers
            .get(container)
            .ok_or_else(|| BlobStoreError::container_not_found(container))?;
        let keys = entry.read();
        Ok(f(&keys))
    }

    fn with_container_mut<T>(
        &self,
        container: &str,
        f: impl FnOnce(&mut KeyStore) -> T,
    ) -> BlobStoreResult<T> {
        let entry = self
            .containers
            .get(container)
            .ok_or_else(|| BlobStoreError::container_not_found(container))?;
        let mut keys = entry.write();
        Ok(f(&mut keys))
    }
}

#[async_trait]
impl AsyncObjectStore for TransientBlobStore {
    async fn create_container(&self, container: &str) -> BlobStoreResult<bool> {
        match self.containers.entry(container.to_owned()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(RwLock::new(KeyStore::default()));
                info!(container = %container, "container created");
                Ok(true)
            }
        }
    }

    async fn container_exists(&self, container: &str) -> BlobStoreResult<bool> {
        Ok(self.containers.contains_key(container))
    }

    async fn blob_exists(&self, container: &str, key: &str) -> BlobStoreResult<bool> {
        self.with_container(container, |keys| keys.contains(key))
    }

    async fn blob_metadata(&self, container: &str, key: &str) -> BlobStoreResult<BlobMetadata> {
        self.with_container(container, |keys| keys.get(key).map(|b| b.metadata.clone()))?
            .ok_or_else(|| BlobStoreError::key_not_found(container, key))
    }

    async fn get_blob(&self, container: &str, key: &str) -> BlobStoreResult<Blob> {
        self.with_container(container, |keys| keys.get(key).cloned())?
            .ok_or_else(|| BlobStoreError::key_not_found(container, key))
    }

    async fn put_blob(&self, container: &str, blob: Blob) -> BlobStoreResult<String> {
        let overwrite = self.overwrite;
        self.with_container_mut(container, |keys| {
            if !overwrite && keys.contains(blob.name()) {
                return Err(BlobStoreError::KeyAlreadyExists {
                    container: container.to_owned(),
                    key: blob.name().to_owned(),
                });
            }
            let (etag, _) = keys.put(blob);
            Ok(etag)
        })?
    }

    async fn remove_blob(&self, container: &str, key: &str) -> BlobStoreResult<()> {
        self.with_container_mut(container, |keys| keys.delete(key))?
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::key_not_found(container, key))
    }

    async fn list(
        &self,
        container: &str,
        request: &ListRequest,
    ) -> BlobStoreResult<PageSet<BlobMetadata>> {
        let start_after = request
            .marker
            .as_ref()
            .map(decode_marker)
            .transpose()?
            .unwrap_or_default();
        let prefix = request.prefix.as_deref().unwrap_or("");

        let result = self.with_container(container, |keys| {
            keys.list(prefix, request.recursive, &start_after, request.max_results)
        })?;

        debug!(
            container = %container,
            prefix = %prefix,
            count = result.entries.len(),
            is_truncated = result.next_key.is_some(),
            "list completed"
        );

        let next_marker = result.next_key.as_deref().map(encode_marker);
        Ok(PageSet::new(result.entries, next_marker))
    }
}
