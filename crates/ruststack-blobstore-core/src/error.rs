//! Blob store error types.
//!
//! Defines [`BlobStoreError`], the error taxonomy shared by stores,
//! strategies, and map views. Single-key operations return these errors
//! directly; batch operations collect them per key inside an
//! [`ExecutionResult`](crate::executor::ExecutionResult) and only raise
//! [`BlobStoreError::Aggregate`] when the caller asks for strict behaviour
//! or a batch exceeds its failure threshold.
//!
//! # Usage
//!
//! ```
//! use ruststack_blobstore_core::error::BlobStoreError;
//!
//! let err = BlobStoreError::KeyNotFound {
//!     container: "photos".to_owned(),
//!     key: "a.jpg".to_owned(),
//! };
//! assert!(err.is_not_found());
//! assert_eq!(err.to_string(), "key a.jpg not found in container photos");
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

/// Blob store error type.
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    // -----------------------------------------------------------------------
    // Lookup errors
    // -----------------------------------------------------------------------
    /// The container does not exist.
    #[error("container {container} not found")]
    ContainerNotFound {
        /// The container that was not found.
        container: String,
    },

    /// The key does not exist in the container.
    #[error("key {key} not found in container {container}")]
    KeyNotFound {
        /// The container that was searched.
        container: String,
        /// The key that was not found.
        key: String,
    },

    /// The store refused to overwrite an existing key.
    #[error("key {key} already exists in container {container}")]
    KeyAlreadyExists {
        /// The container holding the key.
        container: String,
        /// The colliding key.
        key: String,
    },

    // -----------------------------------------------------------------------
    // Batch / timing errors
    // -----------------------------------------------------------------------
    /// The operation was still pending when the caller stopped waiting.
    #[error("operation still pending after {waited:?}")]
    Timeout {
        /// How long the caller waited.
        waited: Duration,
    },

    /// Some keys of a batch operation failed.
    #[error("{} of {attempted} operations failed", failures.len())]
    Aggregate {
        /// Number of keys submitted.
        attempted: usize,
        /// Per-key failures, keyed by the key's string form.
        failures: BTreeMap<String, BlobStoreError>,
    },

    // -----------------------------------------------------------------------
    // Transport / usage errors
    // -----------------------------------------------------------------------
    /// A failure the transport's retry layer may recover from. Never retried here.
    #[error("transient failure: {message}")]
    Transient {
        /// Description of the failure.
        message: String,
    },

    /// An argument provided is invalid.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// The worker pool has been shut down.
    #[error("worker pool has been shut down")]
    PoolShutDown,

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------
    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BlobStoreError {
    /// Whether this error reports a missing key or container.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound { .. } | Self::ContainerNotFound { .. }
        )
    }

    /// Whether this error reports a missing key.
    #[must_use]
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }

    /// Whether this error is a name collision.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::KeyAlreadyExists { .. })
    }

    /// Whether this error reports an operation that did not finish in time.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Shorthand for [`BlobStoreError::KeyNotFound`].
    #[must_use]
    pub fn key_not_found(container: &str, key: &str) -> Self {
        Self::KeyNotFound {
            container: container.to_owned(),
            key: key.to_owned(),
        }
    }

    /// Shorthand for [`BlobStoreError::ContainerNotFound`].
    #[must_use]
    pub fn container_not_found(container: &str) -> Self {
        Self::ContainerNotFound {
            container: container.to_owned(),
        }
    }
}

/// Convenience result type for blob store operations.
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;
