//! Searching a container for a value.

use futures::TryStreamExt;
use ruststack_blobstore_model::{BlobMetadata, ListOptions};
use tracing::{debug, trace};

use crate::checksums::compute_md5;
use crate::error::BlobStoreResult;
use crate::strategy::{GetBlobsInListStrategy, ListingStrategy};

/// Decides whether any object under listing options holds the given bytes.
///
/// Listed metadata rules out objects whose size or content hash differ; only
/// the remaining candidates are downloaded, one pool-sized batch at a time,
/// and the search stops at the first byte-equal payload.
#[derive(Debug, Clone)]
pub struct ContainsValueInListStrategy {
    listing: ListingStrategy,
    getter: GetBlobsInListStrategy,
}

impl ContainsValueInListStrategy {
    /// Create a search over `listing`, downloading through `getter`.
    #[must_use]
    pub fn new(listing: ListingStrategy, getter: GetBlobsInListStrategy) -> Self {
        Self { listing, getter }
    }

    /// Whether some object under `options` has exactly `value` as payload.
    ///
    /// Candidates that vanish before they are downloaded are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first listing error.
    pub async fn execute(
        &self,
        container: &str,
        options: &ListOptions,
        value: &[u8],
    ) -> BlobStoreResult<bool> {
        let size = value.len() as u64;
        let md5 = compute_md5(value);
        let batch = self.getter.executor().pool().size();

        let mut pages = self.listing.pages(container, options);
        let mut downloaded = 0_usize;
        while let Some(page) = pages.try_next().await? {
            let candidates: Vec<String> = page
                .iter()
                .filter(|metadata| could_match(metadata, size, &md5))
                .map(|metadata| metadata.name.clone())
                .collect();

            for chunk in candidates.chunks(batch) {
                downloaded += chunk.len();
                let result = self.getter.fetch(container, chunk.iter().cloned()).await;
                if let Some(key) = result
                    .successes()
                    .iter()
                    .find_map(|(key, blob)| (blob.payload.as_ref() == value).then_some(key))
                {
                    debug!(container = %container, key = %key, downloaded, "value found");
                    return Ok(true);
                }
                trace!(
                    container = %container,
                    skipped = result.failures().len(),
                    "no match in candidate batch"
                );
            }
        }

        debug!(container = %container, downloaded, "value not found");
        Ok(false)
    }
}

fn could_match(metadata: &BlobMetadata, size: u64, md5: &str) -> bool {
    metadata.is_blob()
        && metadata.size == size
        && metadata
            .content_md5
            .as_deref()
            .is_none_or(|hash| hash.eq_ignore_ascii_case(md5))
}
