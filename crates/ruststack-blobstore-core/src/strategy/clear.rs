//! Deleting everything under listing options.

use std::sync::Arc;

use ruststack_blobstore_model::ListOptions;
use tracing::{debug, warn};

use crate::error::BlobStoreResult;
use crate::executor::{ExecutionResult, ScatterGather};
use crate::retry::{BackoffConfig, poll_until};
use crate::store::AsyncObjectStore;
use crate::strategy::{CountListStrategy, ListingStrategy};

/// Lists every object under the options, then deletes them concurrently.
///
/// A key that is already gone counts as deleted, so clearing twice is safe.
/// Objects written while a clear is running may survive it.
#[derive(Debug, Clone)]
pub struct ClearListStrategy {
    store: Arc<dyn AsyncObjectStore>,
    listing: ListingStrategy,
    executor: ScatterGather,
}

impl ClearListStrategy {
    /// Create a clear strategy.
    #[must_use]
    pub fn new(
        store: Arc<dyn AsyncObjectStore>,
        listing: ListingStrategy,
        executor: ScatterGather,
    ) -> Self {
        Self {
            store,
            listing,
            executor,
        }
    }

    /// Delete every object listed under `options`.
    ///
    /// # Errors
    ///
    /// Returns the first listing error. Per-key delete failures are reported
    /// in the result instead.
    pub async fn execute(
        &self,
        container: &str,
        options: &ListOptions,
    ) -> BlobStoreResult<ExecutionResult<String, ()>> {
        let keys: Vec<String> = self
            .listing
            .list_all(container, options)
            .await?
            .into_iter()
            .filter(|metadata| metadata.is_blob())
            .map(|metadata| metadata.name)
            .collect();

        let store = Arc::clone(&self.store);
        let shared: Arc<str> = Arc::from(container);
        let result = self
            .executor
            .execute(keys, |key: String| {
                let store = Arc::clone(&store);
                let container = Arc::clone(&shared);
                async move {
                    match store.remove_blob(&container, &key).await {
                        Err(err) if err.is_key_not_found() => Ok(()),
                        other => other,
                    }
                }
            })
            .await;

        if result.is_success() {
            debug!(container = %container, deleted = result.len(), "cleared");
        } else {
            warn!(
                container = %container,
                deleted = result.successes().len(),
                failed = result.failures().len(),
                "clear left keys behind"
            );
        }
        Ok(result)
    }

    /// Clear, then poll until the count under `options` reads zero.
    ///
    /// Returns the number of keys deleted.
    ///
    /// # Errors
    ///
    /// Returns [`Aggregate`](crate::error::BlobStoreError::Aggregate) when any
    /// delete failed, and [`Timeout`](crate::error::BlobStoreError::Timeout)
    /// when the count stays above zero past `backoff`.
    pub async fn execute_and_verify(
        &self,
        container: &str,
        options: &ListOptions,
        backoff: &BackoffConfig,
    ) -> BlobStoreResult<usize> {
        let deleted = self.execute(container, options).await?.into_strict()?.len();
        let counter = &CountListStrategy::new(self.listing.clone());
        poll_until(backoff, || async move {
            Ok(counter.execute(container, options).await? == 0)
        })
        .await?;
        Ok(deleted)
    }
}
