//! Counting entries across pages.

use futures::TryStreamExt;
use ruststack_blobstore_model::ListOptions;
use tracing::debug;

use crate::error::BlobStoreResult;
use crate::strategy::ListingStrategy;

/// Counts the objects visible under listing options by walking every page.
///
/// Pseudo-directories are not counted.
#[derive(Debug, Clone)]
pub struct CountListStrategy {
    listing: ListingStrategy,
}

impl CountListStrategy {
    /// Create a counter over `listing`.
    #[must_use]
    pub fn new(listing: ListingStrategy) -> Self {
        Self { listing }
    }

    /// Number of objects under `options`.
    ///
    /// # Errors
    ///
    /// Returns the first listing error.
    pub async fn execute(&self, container: &str, options: &ListOptions) -> BlobStoreResult<usize> {
        let mut pages = self.listing.pages(container, options);
        let mut count = 0;
        let mut calls = 0_usize;
        while let Some(page) = pages.try_next().await? {
            calls += 1;
            count += page.iter().filter(|metadata| metadata.is_blob()).count();
        }
        debug!(container = %container, count, calls, "counted entries");
        Ok(count)
    }
}
