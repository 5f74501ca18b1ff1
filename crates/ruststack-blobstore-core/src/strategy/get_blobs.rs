//! Batch reads.

use std::collections::HashMap;
use std::sync::Arc;

use ruststack_blobstore_model::Blob;
use tracing::warn;

use crate::error::BlobStoreResult;
use crate::executor::{ExecutionResult, ScatterGather};
use crate::store::AsyncObjectStore;

/// Reads many keys concurrently on the shared pool.
///
/// A key that fails, for instance because it was deleted after being
/// listed, is logged and left out of [`execute`](Self::execute)'s result
/// unless strict mode is on or more keys fail than the failure threshold
/// allows.
#[derive(Debug, Clone)]
pub struct GetBlobsInListStrategy {
    store: Arc<dyn AsyncObjectStore>,
    executor: ScatterGather,
    strict: bool,
    max_failures: Option<usize>,
}

impl GetBlobsInListStrategy {
    /// Create a lenient batch reader.
    #[must_use]
    pub fn new(store: Arc<dyn AsyncObjectStore>, executor: ScatterGather) -> Self {
        Self {
            store,
            executor,
            strict: false,
            max_failures: None,
        }
    }

    /// Fail the whole batch with an aggregate error when any key fails.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Fail a lenient batch once more than `max_failures` keys fail.
    #[must_use]
    pub fn max_failures(mut self, max_failures: Option<usize>) -> Self {
        self.max_failures = max_failures;
        self
    }

    /// Whether strict mode is on.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The executor reads run on.
    #[must_use]
    pub fn executor(&self) -> &ScatterGather {
        &self.executor
    }

    /// Read every key and return the raw per-key outcomes.
    pub async fn fetch<I, S>(&self, container: &str, keys: I) -> ExecutionResult<String, Blob>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Arc::clone(&self.store);
        let container: Arc<str> = Arc::from(container);
        self.executor
            .execute(keys.into_iter().map(Into::into), |key: String| {
                let store = Arc::clone(&store);
                let container = Arc::clone(&container);
                async move { store.get_blob(&container, &key).await }
            })
            .await
    }

    /// Read every key and return the blobs found, by key.
    ///
    /// # Errors
    ///
    /// Returns [`Aggregate`](crate::error::BlobStoreError::Aggregate) when any
    /// key fails in strict mode, or when the failures exceed the threshold.
    pub async fn execute_keyed<I, S>(
        &self,
        container: &str,
        keys: I,
    ) -> BlobStoreResult<HashMap<String, Blob>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = self.fetch(container, keys).await;
        if self.strict {
            return result.into_strict();
        }
        if let Some(max_failures) = self.max_failures {
            result = result.into_checked(max_failures)?;
        }
        let (successes, failures) = result.into_parts();
        for (key, err) in &failures {
            warn!(container = %container, key = %key, error = %err, "omitting key from batch read");
        }
        Ok(successes)
    }

    /// Read every key and return the blobs found, in the order requested.
    ///
    /// # Errors
    ///
    /// Same as [`execute_keyed`](Self::execute_keyed).
    pub async fn execute<I, S>(&self, container: &str, keys: I) -> BlobStoreResult<Vec<Blob>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let mut found = self.execute_keyed(container, keys.iter().cloned()).await?;
        Ok(keys.iter().filter_map(|key| found.remove(key)).collect())
    }
}
