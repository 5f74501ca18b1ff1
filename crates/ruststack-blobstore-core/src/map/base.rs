//! Operations shared by every view.

use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use std::sync::Arc;

use ruststack_blobstore_model::{Blob, BlobMetadata, ListOptions, Marker, PageSet};
use tracing::{debug, warn};

use crate::config::BlobStoreConfig;
use crate::error::BlobStoreResult;
use crate::executor::{ExecutionResult, ScatterGather};
use crate::map::MapValue;
use crate::store::AsyncObjectStore;
use crate::strategy::{
    ClearListStrategy, ContainsValueInListStrategy, CountListStrategy, GetBlobsInListStrategy,
    ListingStrategy, PutBlobsStrategy,
};

/// Map view over the part of a container selected by [`ListOptions`].
///
/// Keys are relative to the scoped directory. `entry_set`, `key_set` and
/// `values` are snapshots taken when called.
#[derive(Debug, Clone)]
pub struct BaseBlobMap<V> {
    store: Arc<dyn AsyncObjectStore>,
    container: String,
    options: ListOptions,
    listing: ListingStrategy,
    getter: GetBlobsInListStrategy,
    putter: PutBlobsStrategy,
    counter: CountListStrategy,
    searcher: ContainsValueInListStrategy,
    clearer: ClearListStrategy,
    _value: PhantomData<fn() -> V>,
}

impl<V: MapValue> BaseBlobMap<V> {
    /// Create a view of `container` scoped by `options`, fanning out on
    /// `executor`.
    #[must_use]
    pub fn new(
        store: Arc<dyn AsyncObjectStore>,
        executor: ScatterGather,
        config: &BlobStoreConfig,
        container: impl Into<String>,
        options: ListOptions,
    ) -> Self {
        let listing = ListingStrategy::new(Arc::clone(&store), config.page_size());
        let getter = GetBlobsInListStrategy::new(Arc::clone(&store), executor.clone())
            .strict(config.strict_batch);
        Self {
            putter: PutBlobsStrategy::new(Arc::clone(&store), executor.clone()),
            counter: CountListStrategy::new(listing.clone()),
            searcher: ContainsValueInListStrategy::new(listing.clone(), getter.clone()),
            clearer: ClearListStrategy::new(Arc::clone(&store), listing.clone(), executor),
            store,
            container: container.into(),
            options,
            listing,
            getter,
            _value: PhantomData,
        }
    }

    /// Container the view reads.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Options the view is scoped by.
    #[must_use]
    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Number of objects in scope. Walks every listing page.
    ///
    /// # Errors
    ///
    /// Returns the first listing error.
    pub async fn len(&self) -> BlobStoreResult<usize> {
        self.counter.execute(&self.container, &self.options).await
    }

    /// Whether no object is in scope.
    ///
    /// # Errors
    ///
    /// Returns the first listing error.
    pub async fn is_empty(&self) -> BlobStoreResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Whether an object exists under `key`.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn contains_key(&self, key: &str) -> BlobStoreResult<bool> {
        self.store
            .blob_exists(&self.container, &self.options.full_key(key))
            .await
    }

    /// Whether some object in scope has the same payload as `value`.
    ///
    /// # Errors
    ///
    /// Returns the first listing error.
    pub async fn contains_value(&self, value: &V) -> BlobStoreResult<bool> {
        self.searcher
            .execute(&self.container, &self.options, value.payload())
            .await
    }

    /// Value under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns the store's error for anything but a missing key.
    pub async fn get(&self, key: &str) -> BlobStoreResult<Option<V>> {
        match self
            .store
            .get_blob(&self.container, &self.options.full_key(key))
            .await
        {
            Ok(blob) => Ok(Some(V::from_blob(blob))),
            Err(err) if err.is_key_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Read many keys concurrently.
    pub async fn get_all<I, S>(&self, keys: I) -> ExecutionResult<String, V>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let full: Vec<String> = keys
            .into_iter()
            .map(|key| self.options.full_key(key.as_ref()))
            .collect();
        self.getter
            .fetch(&self.container, full)
            .await
            .map(|key| self.relative(key), V::from_blob)
    }

    /// Store `value` under `key` and return the value it replaced.
    ///
    /// If the store refuses to overwrite, the existing object is deleted and
    /// the write is retried once.
    ///
    /// # Errors
    ///
    /// Returns the store's error, including a second collision.
    pub async fn put(&self, key: &str, value: V) -> BlobStoreResult<Option<V>> {
        let previous = self.get(key).await?;
        let full = self.options.full_key(key);
        self.write(value.into_blob(full)).await?;
        Ok(previous)
    }

    /// Store many values concurrently. Successes carry the entity tag.
    pub async fn put_all<I, S>(&self, entries: I) -> ExecutionResult<String, String>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
    {
        let blobs: Vec<Blob> = entries
            .into_iter()
            .map(|(key, value)| value.into_blob(self.options.full_key(key.as_ref())))
            .collect();
        self.putter
            .execute(&self.container, blobs)
            .await
            .map(|key| self.relative(key), |etag| etag)
    }

    /// Delete `key` and return the value it held.
    ///
    /// # Errors
    ///
    /// Returns the store's error for anything but a missing key.
    pub async fn remove(&self, key: &str) -> BlobStoreResult<Option<V>> {
        let previous = self.get(key).await?;
        if previous.is_some() {
            match self
                .store
                .remove_blob(&self.container, &self.options.full_key(key))
                .await
            {
                Err(err) if !err.is_key_not_found() => return Err(err),
                _ => {}
            }
        }
        Ok(previous)
    }

    /// Delete every object in scope.
    ///
    /// # Errors
    ///
    /// Returns the first listing error. Per-key failures are in the result.
    pub async fn clear(&self) -> BlobStoreResult<ExecutionResult<String, ()>> {
        let result = self.clearer.execute(&self.container, &self.options).await?;
        Ok(result.map(|key| self.relative(key), |()| ()))
    }

    /// Keys of every object in scope.
    ///
    /// # Errors
    ///
    /// Returns the first listing error.
    pub async fn key_set(&self) -> BlobStoreResult<BTreeSet<String>> {
        Ok(self
            .object_keys()
            .await?
            .into_iter()
            .map(|key| self.relative(key))
            .collect())
    }

    /// Values of every object in scope, in key order.
    ///
    /// Objects that vanish between listing and reading are left out unless
    /// the view is strict.
    ///
    /// # Errors
    ///
    /// Returns the first listing error, or an aggregate error in strict mode.
    pub async fn values(&self) -> BlobStoreResult<Vec<V>> {
        let keys = self.object_keys().await?;
        let blobs = self.getter.execute(&self.container, keys).await?;
        Ok(blobs.into_iter().map(V::from_blob).collect())
    }

    /// Snapshot of every entry in scope.
    ///
    /// # Errors
    ///
    /// Same as [`values`](Self::values).
    pub async fn entry_set(&self) -> BlobStoreResult<BTreeMap<String, V>> {
        let keys = self.object_keys().await?;
        let found = self.getter.execute_keyed(&self.container, keys).await?;
        debug!(container = %self.container, count = found.len(), "entry set materialised");
        Ok(found
            .into_iter()
            .map(|(key, blob)| (self.relative(key), V::from_blob(blob)))
            .collect())
    }

    /// One page of raw metadata, resuming after `marker`.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn list(&self, marker: Option<Marker>) -> BlobStoreResult<PageSet<BlobMetadata>> {
        let options = match marker {
            Some(marker) => self.options.clone().after_marker(marker),
            None => self.options.clone(),
        };
        self.listing.execute(&self.container, &options).await
    }

    pub(crate) async fn write(&self, blob: Blob) -> BlobStoreResult<String> {
        match self.store.put_blob(&self.container, blob.clone()).await {
            Err(err) if err.is_already_exists() => {
                warn!(
                    container = %self.container,
                    key = %blob.name(),
                    "name collision, replacing existing object"
                );
                match self.store.remove_blob(&self.container, blob.name()).await {
                    Err(err) if !err.is_key_not_found() => return Err(err),
                    _ => {}
                }
                self.store.put_blob(&self.container, blob).await
            }
            other => other,
        }
    }

    async fn object_keys(&self) -> BlobStoreResult<Vec<String>> {
        Ok(self
            .listing
            .list_all(&self.container, &self.options)
            .await?
            .into_iter()
            .filter(BlobMetadata::is_blob)
            .map(|metadata| metadata.name)
            .collect())
    }

    fn relative(&self, full: String) -> String {
        match self.options.relative_key(&full) {
            Some(key) => key.to_owned(),
            None => full,
        }
    }
}
