//! Shared bounded worker pool.
//!
//! Every fan-out draws permits from one [`WorkerPool`], so the number of
//! per-key operations in flight across the process never exceeds its size.
//! Waiting for results happens outside the pool: a gathering caller never
//! holds a permit. An operation that itself fans out runs its inner keys
//! under the permit it already holds instead of acquiring more, so nesting
//! cannot starve the pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::info;

use crate::error::{BlobStoreError, BlobStoreResult};

/// Bounded pool of permits for concurrent per-key operations.
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_core::pool::WorkerPool;
///
/// # tokio_test::block_on(async {
/// let pool = WorkerPool::new(2);
/// let permit = pool.acquire().await.unwrap();
/// assert_eq!(pool.available(), 1);
/// drop(permit);
///
/// pool.shutdown();
/// assert!(pool.acquire().await.is_err());
/// # });
/// ```
#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
    closed: AtomicBool,
}

impl WorkerPool {
    /// Create a pool running at most `size` operations at once (at least one).
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
            closed: AtomicBool::new(false),
        }
    }

    /// Wait for a free slot.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::PoolShutDown`] once [`shutdown`](Self::shutdown)
    /// has been called, including for callers already waiting.
    pub async fn acquire(&self) -> BlobStoreResult<OwnedSemaphorePermit> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| BlobStoreError::PoolShutDown)
    }

    /// Stop handing out permits. Operations already running keep theirs.
    ///
    /// Calling this more than once has no further effect.
    pub fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.permits.close();
            info!(size = self.size, "worker pool shut down");
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Maximum number of concurrent operations.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Permits not currently held.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
