//! Process-wide entry point.
//!
//! [`BlobStoreContext`] owns the store, the configuration and the worker pool
//! every view fans out on. Views borrow nothing from it; closing the context
//! shuts the pool down, after which their batch operations report
//! [`PoolShutDown`](crate::error::BlobStoreError::PoolShutDown) per key.

use std::sync::Arc;

use ruststack_blobstore_model::ListOptions;
use tracing::info;

use crate::config::BlobStoreConfig;
use crate::executor::ScatterGather;
use crate::map::{BlobMap, InputStreamMap};
use crate::pool::WorkerPool;
use crate::store::AsyncObjectStore;
use crate::strategy::{
    ClearListStrategy, ContainsValueInListStrategy, CountListStrategy, GetBlobsInListStrategy,
    ListingStrategy, PutBlobsStrategy,
};

/// Owner of the store, configuration and shared worker pool.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use ruststack_blobstore_core::config::BlobStoreConfig;
/// use ruststack_blobstore_core::context::BlobStoreContext;
/// use ruststack_blobstore_core::store::AsyncObjectStore;
/// use ruststack_blobstore_core::transient::TransientBlobStore;
///
/// # tokio_test::block_on(async {
/// let context = BlobStoreContext::new(
///     Arc::new(TransientBlobStore::new()),
///     BlobStoreConfig::default(),
/// );
/// context.store().create_container("docs").await.unwrap();
///
/// let map = context.input_stream_map("docs");
/// map.put_string("readme", "hello").await.unwrap();
/// assert_eq!(map.len().await.unwrap(), 1);
///
/// context.close();
/// # });
/// ```
#[derive(Debug)]
pub struct BlobStoreContext {
    store: Arc<dyn AsyncObjectStore>,
    config: BlobStoreConfig,
    pool: Arc<WorkerPool>,
}

impl BlobStoreContext {
    /// Create a context with a pool sized by `config`.
    #[must_use]
    pub fn new(store: Arc<dyn AsyncObjectStore>, config: BlobStoreConfig) -> Self {
        let pool = Arc::new(WorkerPool::new(config.pool_size()));
        info!(
            pool_size = pool.size(),
            page_size = config.page_size(),
            timeout_ms = ?config.request_timeout_ms,
            strict_batch = config.strict_batch,
            max_batch_failures = ?config.max_batch_failures,
            "blob store context created"
        );
        Self {
            store,
            config,
            pool,
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn AsyncObjectStore> {
        &self.store
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &BlobStoreConfig {
        &self.config
    }

    /// The shared worker pool.
    #[must_use]
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Executor on the shared pool, bounded by the configured timeout.
    #[must_use]
    pub fn executor(&self) -> ScatterGather {
        ScatterGather::new(Arc::clone(&self.pool)).with_max_duration(self.config.request_timeout())
    }

    /// Listing strategy with the configured page size.
    #[must_use]
    pub fn listing(&self) -> ListingStrategy {
        ListingStrategy::new(Arc::clone(&self.store), self.config.page_size())
    }

    /// Batch reader, strict or failure-bounded when configured so.
    #[must_use]
    pub fn get_blobs(&self) -> GetBlobsInListStrategy {
        GetBlobsInListStrategy::new(Arc::clone(&self.store), self.executor())
            .strict(self.config.strict_batch)
            .max_failures(self.config.max_batch_failures)
    }

    /// Batch writer.
    #[must_use]
    pub fn put_blobs(&self) -> PutBlobsStrategy {
        PutBlobsStrategy::new(Arc::clone(&self.store), self.executor())
    }

    /// Object counter.
    #[must_use]
    pub fn count(&self) -> CountListStrategy {
        CountListStrategy::new(self.listing())
    }

    /// Value search.
    #[must_use]
    pub fn contains_value(&self) -> ContainsValueInListStrategy {
        ContainsValueInListStrategy::new(self.listing(), self.get_blobs())
    }

    /// Bulk delete.
    #[must_use]
    pub fn clear(&self) -> ClearListStrategy {
        ClearListStrategy::new(Arc::clone(&self.store), self.listing(), self.executor())
    }

    /// Blob view of the top level of `container`.
    #[must_use]
    pub fn blob_map(&self, container: &str) -> BlobMap {
        self.blob_map_with(container, ListOptions::new())
    }

    /// Blob view of `container` scoped by `options`.
    #[must_use]
    pub fn blob_map_with(&self, container: &str, options: ListOptions) -> BlobMap {
        BlobMap::new(
            Arc::clone(&self.store),
            self.executor(),
            &self.config,
            container,
            options,
        )
    }

    /// Byte view of the top level of `container`.
    #[must_use]
    pub fn input_stream_map(&self, container: &str) -> InputStreamMap {
        self.input_stream_map_with(container, ListOptions::new())
    }

    /// Byte view of `container` scoped by `options`.
    #[must_use]
    pub fn input_stream_map_with(&self, container: &str, options: ListOptions) -> InputStreamMap {
        InputStreamMap::new(
            Arc::clone(&self.store),
            self.executor(),
            &self.config,
            container,
            options,
        )
    }

    /// Shut the worker pool down. Calling this again has no effect.
    pub fn close(&self) {
        if !self.pool.is_shutdown() {
            info!("closing blob store context");
        }
        self.pool.shutdown();
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_shutdown()
    }
}
