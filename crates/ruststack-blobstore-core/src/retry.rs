//! Bounded polling with exponential backoff.
//!
//! [`poll_until`] re-evaluates an asynchronous condition until it holds,
//! giving up after [`BackoffConfig::max_attempts`] evaluations or once
//! [`BackoffConfig::deadline`] has passed, whichever comes first.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tokio::time::Instant;
use tracing::debug;

use crate::error::{BlobStoreError, BlobStoreResult};

/// Limits for [`poll_until`].
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Total evaluations of the condition, the first one included.
    pub max_attempts: usize,
    /// Delay before the second evaluation.
    pub initial_delay: Duration,
    /// Upper bound on the delay between evaluations.
    pub max_delay: Duration,
    /// Overall time budget.
    pub deadline: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
            deadline: Duration::from_secs(10),
        }
    }
}

impl BackoffConfig {
    /// Set the number of evaluations.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the overall time budget.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    fn build_backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1))
            .with_factor(2.0)
    }
}

#[derive(Debug)]
enum Poll {
    NotYet,
    Failed(BlobStoreError),
}

/// Evaluate `condition` until it returns `true`.
///
/// An error from the condition ends polling immediately.
///
/// # Errors
///
/// Returns [`BlobStoreError::Timeout`] when the attempts or the deadline run
/// out, or the condition's own error.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use ruststack_blobstore_core::retry::{BackoffConfig, poll_until};
///
/// # tokio_test::block_on(async {
/// let calls = &AtomicUsize::new(0);
/// poll_until(&BackoffConfig::default(), || async move {
///     Ok(calls.fetch_add(1, Ordering::SeqCst) >= 2)
/// })
/// .await
/// .unwrap();
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # });
/// ```
pub async fn poll_until<F, Fut>(config: &BackoffConfig, mut condition: F) -> BlobStoreResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BlobStoreResult<bool>>,
{
    let started = Instant::now();
    let mut attempt = 0_usize;

    let polling = (|| {
        let check = condition();
        async move {
            match check.await {
                Ok(true) => Ok(()),
                Ok(false) => Err(Poll::NotYet),
                Err(err) => Err(Poll::Failed(err)),
            }
        }
    })
    .retry(config.build_backoff())
    .when(|outcome| matches!(outcome, Poll::NotYet))
    .notify(|_, delay| {
        attempt += 1;
        debug!(
            attempt,
            next_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "condition not met yet"
        );
    });

    match tokio::time::timeout(config.deadline, polling).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(Poll::Failed(err))) => Err(err),
        Ok(Err(Poll::NotYet)) | Err(_) => Err(BlobStoreError::Timeout {
            waited: started.elapsed(),
        }),
    }
}
