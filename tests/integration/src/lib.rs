//! Integration tests for the RustStack blob store collection views.
//!
//! The tests drive the views end to end over the in-memory store, wrapped in
//! an [`InstrumentedStore`] that adds latency, injects read failures and
//! counts remote calls. They run under plain `cargo test`:
//!
//! ```text
//! cargo test -p ruststack-blobstore-integration
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use ruststack_blobstore_core::{
    AsyncObjectStore, BlobStoreConfig, BlobStoreContext, BlobStoreError, BlobStoreResult,
    TransientBlobStore,
};
use ruststack_blobstore_model::{Blob, BlobMetadata, ListRequest, PageSet};

static INIT: Once = Once::new();

/// Initialize tracing (once), filtered by `RUST_LOG` or else the configured
/// `LOG_LEVEL`.
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(BlobStoreConfig::from_env().log_level)
                }),
            )
            .with_test_writer()
            .init();
    });
}

/// Generate a unique container name for a test.
#[must_use]
pub fn test_container_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

// ---------------------------------------------------------------------------
// InstrumentedStore
// ---------------------------------------------------------------------------

/// In-memory store with injected latency and read failures, counting calls.
///
/// Latency applies to per-key reads and deletes only, so seeding data through
/// [`inner`](Self::inner) stays instant.
#[derive(Debug, Default)]
pub struct InstrumentedStore {
    inner: TransientBlobStore,
    latency: Duration,
    missing_on_get: Mutex<HashSet<String>>,
    hide_hashes: AtomicBool,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl InstrumentedStore {
    /// Create an instant, failure-free store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every read and delete by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make reads of `key` fail with a missing-key error, as if the object
    /// was deleted right after being listed.
    pub fn fail_get(&self, key: &str) {
        self.missing_on_get.lock().insert(key.to_owned());
    }

    /// List entries without content hashes, as stores that do not report
    /// them do.
    #[must_use]
    pub fn without_listed_hashes(self) -> Self {
        self.hide_hashes.store(true, Ordering::SeqCst);
        self
    }

    /// The wrapped store, without latency or failures.
    #[must_use]
    pub fn inner(&self) -> &TransientBlobStore {
        &self.inner
    }

    /// Number of listing calls so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of read calls so far.
    #[must_use]
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl AsyncObjectStore for InstrumentedStore {
    async fn create_container(&self, container: &str) -> BlobStoreResult<bool> {
        self.inner.create_container(container).await
    }

    async fn container_exists(&self, container: &str) -> BlobStoreResult<bool> {
        self.inner.container_exists(container).await
    }

    async fn blob_exists(&self, container: &str, key: &str) -> BlobStoreResult<bool> {
        self.inner.blob_exists(container, key).await
    }

    async fn blob_metadata(&self, container: &str, key: &str) -> BlobStoreResult<BlobMetadata> {
        self.inner.blob_metadata(container, key).await
    }

    async fn get_blob(&self, container: &str, key: &str) -> BlobStoreResult<Blob> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        if self.missing_on_get.lock().contains(key) {
            return Err(BlobStoreError::key_not_found(container, key));
        }
        self.inner.get_blob(container, key).await
    }

    async fn put_blob(&self, container: &str, blob: Blob) -> BlobStoreResult<String> {
        self.inner.put_blob(container, blob).await
    }

    async fn remove_blob(&self, container: &str, key: &str) -> BlobStoreResult<()> {
        self.delay().await;
        self.inner.remove_blob(container, key).await
    }

    async fn list(
        &self,
        container: &str,
        request: &ListRequest,
    ) -> BlobStoreResult<PageSet<BlobMetadata>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let page = self.inner.list(container, request).await?;
        if !self.hide_hashes.load(Ordering::SeqCst) {
            return Ok(page);
        }
        Ok(page.map(|mut metadata| {
            metadata.content_md5 = None;
            metadata
        }))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A context over a fresh instrumented store with one empty container.
#[derive(Debug)]
pub struct Fixture {
    /// The instrumented store behind the context.
    pub store: Arc<InstrumentedStore>,
    /// The context under test.
    pub context: BlobStoreContext,
    /// Name of the container created for the test.
    pub container: String,
}

impl Fixture {
    /// Seed `key` with `payload`, bypassing latency.
    pub async fn seed(&self, key: &str, payload: &str) {
        self.store
            .inner()
            .put_blob(&self.container, Blob::new(key, payload.to_owned()))
            .await
            .unwrap_or_else(|e| panic!("failed to seed {key}: {e}"));
    }
}

/// Build a [`Fixture`] over `store` with `config`.
pub async fn fixture(prefix: &str, store: InstrumentedStore, config: BlobStoreConfig) -> Fixture {
    init_tracing();

    let store = Arc::new(store);
    let context = BlobStoreContext::new(store.clone(), config);
    let container = test_container_name(prefix);
    store
        .create_container(&container)
        .await
        .unwrap_or_else(|e| panic!("failed to create container {container}: {e}"));
    Fixture {
        store,
        context,
        container,
    }
}

mod test_listing;
mod test_map;
mod test_strategies;
