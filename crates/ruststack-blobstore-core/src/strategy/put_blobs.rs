//! Batch writes.

use std::collections::HashMap;
use std::sync::Arc;

use ruststack_blobstore_model::Blob;

use crate::executor::{ExecutionResult, ScatterGather};
use crate::store::AsyncObjectStore;

/// Writes many blobs concurrently on the shared pool.
#[derive(Debug, Clone)]
pub struct PutBlobsStrategy {
    store: Arc<dyn AsyncObjectStore>,
    executor: ScatterGather,
}

impl PutBlobsStrategy {
    /// Create a batch writer.
    #[must_use]
    pub fn new(store: Arc<dyn AsyncObjectStore>, executor: ScatterGather) -> Self {
        Self { store, executor }
    }

    /// Write every blob under its name. Successes carry the entity tag.
    ///
    /// When several blobs share a name, the last one wins.
    pub async fn execute(
        &self,
        container: &str,
        blobs: impl IntoIterator<Item = Blob>,
    ) -> ExecutionResult<String, String> {
        let by_name: HashMap<String, Blob> = blobs
            .into_iter()
            .map(|blob| (blob.name().to_owned(), blob))
            .collect();
        let names: Vec<String> = by_name.keys().cloned().collect();
        let by_name = Arc::new(by_name);

        let store = Arc::clone(&self.store);
        let container: Arc<str> = Arc::from(container);
        self.executor
            .execute(names, |name: String| {
                let store = Arc::clone(&store);
                let container = Arc::clone(&container);
                let blob = by_name.get(&name).cloned();
                async move {
                    match blob {
                        Some(blob) => store.put_blob(&container, blob).await,
                        None => Err(anyhow::anyhow!("no blob named {name}").into()),
                    }
                }
            })
            .await
    }
}
