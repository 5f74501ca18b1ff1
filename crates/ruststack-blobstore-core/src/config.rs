//! Blob store view configuration.
//!
//! Provides [`BlobStoreConfig`] for sizing the shared worker pool, bounding
//! scatter-gather calls, and choosing the default listing page size.
//! Configuration values can be loaded from environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default number of concurrent per-key operations.
pub const DEFAULT_USER_THREADS: usize = 10;

/// Default number of entries requested per listing page.
pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Blob store view configuration.
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_core::config::BlobStoreConfig;
///
/// let config = BlobStoreConfig::default();
/// assert_eq!(config.user_threads, 10);
/// assert_eq!(config.max_results, 1000);
/// assert!(config.request_timeout().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct BlobStoreConfig {
    /// Size of the worker pool shared by every fan-out operation.
    #[builder(default = DEFAULT_USER_THREADS)]
    pub user_threads: usize,

    /// Upper bound, in milliseconds, on how long a scatter-gather call waits.
    #[builder(default, setter(strip_option))]
    pub request_timeout_ms: Option<u64>,

    /// Page size used when listing options do not set one.
    #[builder(default = DEFAULT_MAX_RESULTS)]
    pub max_results: usize,

    /// Whether batch reads fail with an aggregate error instead of omitting
    /// failed keys.
    #[builder(default = false)]
    pub strict_batch: bool,

    /// Number of failed keys a lenient batch read tolerates before failing
    /// with an aggregate error; `None` tolerates any number.
    #[builder(default, setter(strip_option))]
    pub max_batch_failures: Option<usize>,

    /// Log level filter string (e.g. `"info"`, `"debug"`), used when
    /// `RUST_LOG` is unset.
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            user_threads: DEFAULT_USER_THREADS,
            request_timeout_ms: None,
            max_results: DEFAULT_MAX_RESULTS,
            strict_batch: false,
            max_batch_failures: None,
            log_level: String::from("info"),
        }
    }
}

impl BlobStoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `BLOBSTORE_USER_THREADS` | `10` |
    /// | `BLOBSTORE_REQUEST_TIMEOUT_MS` | *(unset)* |
    /// | `BLOBSTORE_MAX_RESULTS` | `1000` |
    /// | `BLOBSTORE_STRICT_BATCH` | `false` |
    /// | `BLOBSTORE_MAX_BATCH_FAILURES` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Examples
    ///
    /// ```
    /// use ruststack_blobstore_core::config::BlobStoreConfig;
    ///
    /// let config = BlobStoreConfig::from_env();
    /// assert!(config.pool_size() >= 1);
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("BLOBSTORE_USER_THREADS") {
            if let Ok(n) = v.parse::<usize>() {
                config.user_threads = n;
            }
        }
        if let Ok(v) = std::env::var("BLOBSTORE_REQUEST_TIMEOUT_MS") {
            if let Ok(n) = v.parse::<u64>() {
                config.request_timeout_ms = Some(n);
            }
        }
        if let Ok(v) = std::env::var("BLOBSTORE_MAX_RESULTS") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_results = n;
            }
        }
        if let Ok(v) = std::env::var("BLOBSTORE_STRICT_BATCH") {
            config.strict_batch = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("BLOBSTORE_MAX_BATCH_FAILURES") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_batch_failures = Some(n);
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Worker pool size, never less than one.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.user_threads.max(1)
    }

    /// Listing page size, never less than one.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.max_results.max(1)
    }

    /// Global scatter-gather timeout, if configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
