//! Map-like collection views over remote, paginated object stores.
//!
//! A remote container is presented as an associative collection whose bulk
//! operations fan out one asynchronous call per key on a shared, bounded
//! worker pool and gather per-key successes and failures.
//!
//! # Architecture
//!
//! ```text
//!  BlobMap / InputStreamMap (get, put, entry_set, clear, ...)
//!        |
//!        v
//!  Strategies (listing, batch get/put, count, contains value, clear)
//!        |                     |
//!        |                     v
//!        |               ScatterGather ---> WorkerPool
//!        v
//!  AsyncObjectStore (TransientBlobStore, or a provider binding)
//! ```

pub mod checksums;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod map;
pub mod pool;
pub mod retry;
pub mod store;
pub mod strategy;
pub mod transient;
pub mod utils;

pub use config::BlobStoreConfig;
pub use context::BlobStoreContext;
pub use error::{BlobStoreError, BlobStoreResult};
pub use executor::{ExecutionResult, ScatterGather};
pub use map::{BlobMap, InputStreamMap};
pub use store::AsyncObjectStore;
pub use transient::TransientBlobStore;
