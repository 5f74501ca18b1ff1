//! Scatter-gather execution.
//!
//! [`ScatterGather::execute`] runs one asynchronous operation per key on the
//! shared [`WorkerPool`] and gathers every outcome into an
//! [`ExecutionResult`]. Each key's task holds a pool permit only while its own
//! operation runs; outcomes travel back over a channel to the caller, which is
//! the only owner of the result maps.
//!
//! A gather started from inside a pool task (an operation that fans out
//! again) does not draw new permits: its keys run under the permit the
//! enclosing task already holds. Nested fan-out on a saturated pool therefore
//! completes instead of waiting on permits its own callers hold.
//!
//! Every submitted key ends up in exactly one of the two maps. Keys still
//! running when the optional deadline passes are reported as
//! [`BlobStoreError::Timeout`]; their tasks are not cancelled and whatever
//! they produce later is dropped.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{Debug, Display};
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::error::{BlobStoreError, BlobStoreResult};
use crate::pool::WorkerPool;

tokio::task_local! {
    static HOLDS_PERMIT: bool;
}

/// Whether the current task runs on behalf of a pool permit.
fn holds_permit() -> bool {
    HOLDS_PERMIT.try_with(|held| *held).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// ExecutionResult
// ---------------------------------------------------------------------------

/// Outcome of a scatter-gather call: per-key values and per-key errors.
#[derive(Debug)]
pub struct ExecutionResult<K, V> {
    successes: HashMap<K, V>,
    failures: HashMap<K, BlobStoreError>,
}

impl<K, V> Default for ExecutionResult<K, V> {
    fn default() -> Self {
        Self {
            successes: HashMap::new(),
            failures: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> ExecutionResult<K, V> {
    /// Values of the keys whose operation succeeded.
    #[must_use]
    pub fn successes(&self) -> &HashMap<K, V> {
        &self.successes
    }

    /// Errors of the keys whose operation failed or did not finish in time.
    #[must_use]
    pub fn failures(&self) -> &HashMap<K, BlobStoreError> {
        &self.failures
    }

    /// Split into the success and failure maps.
    #[must_use]
    pub fn into_parts(self) -> (HashMap<K, V>, HashMap<K, BlobStoreError>) {
        (self.successes, self.failures)
    }

    /// Whether no key failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of keys accounted for.
    #[must_use]
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Whether no key was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Translate keys and values, keeping every key in the same map.
    #[must_use]
    pub fn map<K2, V2>(
        self,
        mut key: impl FnMut(K) -> K2,
        mut value: impl FnMut(V) -> V2,
    ) -> ExecutionResult<K2, V2>
    where
        K2: Eq + Hash,
    {
        ExecutionResult {
            successes: self
                .successes
                .into_iter()
                .map(|(k, v)| (key(k), value(v)))
                .collect(),
            failures: self
                .failures
                .into_iter()
                .map(|(k, err)| (key(k), err))
                .collect(),
        }
    }

    fn record(&mut self, key: K, outcome: BlobStoreResult<V>) {
        match outcome {
            Ok(value) => {
                self.successes.insert(key, value);
            }
            Err(err) => {
                self.failures.insert(key, err);
            }
        }
    }
}

impl<K: Eq + Hash + Display, V> ExecutionResult<K, V> {
    /// Return the values, or [`BlobStoreError::Aggregate`] if any key failed.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Aggregate`] carrying every per-key failure.
    pub fn into_strict(self) -> BlobStoreResult<HashMap<K, V>> {
        self.into_checked(0).map(|result| result.successes)
    }

    /// Keep the result unless more than `max_failures` keys failed.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Aggregate`] carrying every per-key failure
    /// when the failure count exceeds `max_failures`.
    pub fn into_checked(self, max_failures: usize) -> BlobStoreResult<Self> {
        if self.failures.len() <= max_failures {
            return Ok(self);
        }
        let attempted = self.len();
        let failures: BTreeMap<String, BlobStoreError> = self
            .failures
            .into_iter()
            .map(|(key, err)| (key.to_string(), err))
            .collect();
        Err(BlobStoreError::Aggregate {
            attempted,
            failures,
        })
    }
}

// ---------------------------------------------------------------------------
// ScatterGather
// ---------------------------------------------------------------------------

/// Bounded-concurrency fan-out over a set of keys.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use ruststack_blobstore_core::error::BlobStoreError;
/// use ruststack_blobstore_core::executor::ScatterGather;
/// use ruststack_blobstore_core::pool::WorkerPool;
///
/// # tokio_test::block_on(async {
/// let executor = ScatterGather::new(Arc::new(WorkerPool::new(4)));
/// let result = executor
///     .execute(vec![1_u32, 2, 3], |n| async move {
///         if n == 2 {
///             Err(BlobStoreError::key_not_found("c", "2"))
///         } else {
///             Ok(n * 10)
///         }
///     })
///     .await;
///
/// assert_eq!(result.successes().len(), 2);
/// assert!(result.failures()[&2].is_not_found());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ScatterGather {
    pool: Arc<WorkerPool>,
    max_duration: Option<Duration>,
}

impl ScatterGather {
    /// Fan out on `pool`, waiting for every key without a deadline.
    #[must_use]
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self {
            pool,
            max_duration: None,
        }
    }

    /// Stop waiting after `max_duration`; `None` waits for every key.
    #[must_use]
    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// The pool operations run on.
    #[must_use]
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// The configured deadline, if any.
    #[must_use]
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration
    }

    /// Run `op` once per distinct key and gather the outcomes.
    ///
    /// Returns immediately for an empty key set. Never fails as a whole:
    /// per-key errors, pool shutdown, panics and timeouts all land in
    /// [`ExecutionResult::failures`].
    ///
    /// Called from within an operation already running on the pool, the keys
    /// share that operation's permit rather than acquiring their own.
    pub async fn execute<K, V, F, Fut>(
        &self,
        keys: impl IntoIterator<Item = K>,
        op: F,
    ) -> ExecutionResult<K, V>
    where
        K: Eq + Hash + Clone + Debug + Send + 'static,
        V: Send + 'static,
        F: Fn(K) -> Fut,
        Fut: Future<Output = BlobStoreResult<V>> + Send + 'static,
    {
        let mut pending: HashSet<K> = HashSet::new();
        let unique: Vec<K> = keys
            .into_iter()
            .filter(|key| pending.insert(key.clone()))
            .collect();

        let mut result = ExecutionResult::default();
        if unique.is_empty() {
            return result;
        }

        let attempted = unique.len();
        let nested = holds_permit();
        let started = Instant::now();
        let deadline = self.max_duration.map(|d| started + d);
        let (tx, mut rx) = mpsc::unbounded_channel::<(K, BlobStoreResult<V>)>();

        for key in unique {
            let work = op(key.clone());
            let pool = Arc::clone(&self.pool);
            let tx = tx.clone();
            tokio::spawn(HOLDS_PERMIT.scope(true, async move {
                let outcome = if nested {
                    if pool.is_shutdown() {
                        Err(BlobStoreError::PoolShutDown)
                    } else {
                        work.await
                    }
                } else {
                    match pool.acquire().await {
                        Ok(_permit) => work.await,
                        Err(err) => Err(err),
                    }
                };
                // The gatherer is gone once it stopped waiting.
                let _ = tx.send((key, outcome));
            }));
        }
        drop(tx);

        while !pending.is_empty() {
            let received = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, rx.recv()).await {
                    Ok(received) => received,
                    Err(_) => break,
                },
                None => rx.recv().await,
            };
            let Some((key, outcome)) = received else {
                break;
            };
            trace!(key = ?key, ok = outcome.is_ok(), "scatter-gather key completed");
            pending.remove(&key);
            result.record(key, outcome);
        }

        if !pending.is_empty() {
            let waited = started.elapsed();
            let timed_out = deadline.is_some_and(|d| Instant::now() >= d);
            warn!(
                pending = pending.len(),
                attempted,
                waited_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                timed_out,
                "scatter-gather returned with pending keys"
            );
            for key in pending {
                let err = if timed_out {
                    BlobStoreError::Timeout { waited }
                } else {
                    anyhow::anyhow!("operation for {key:?} ended without reporting").into()
                };
                result.failures.insert(key, err);
            }
        }

        debug!(
            attempted,
            nested,
            succeeded = result.successes.len(),
            failed = result.failures.len(),
            "scatter-gather completed"
        );
        result
    }
}
