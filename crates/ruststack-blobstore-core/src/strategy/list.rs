//! Paginated metadata listing.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use ruststack_blobstore_model::{BlobMetadata, ListOptions, PageSet};
use tracing::debug;

use crate::error::BlobStoreResult;
use crate::store::AsyncObjectStore;

/// Lists container metadata one page per remote call.
///
/// Grouping into pseudo-directories is done by the store according to the
/// listing contract; this strategy applies the default page size, drops user
/// metadata unless details were requested, and follows markers forward.
#[derive(Debug, Clone)]
pub struct ListingStrategy {
    store: Arc<dyn AsyncObjectStore>,
    default_max_results: usize,
}

impl ListingStrategy {
    /// Create a listing strategy using `default_max_results` when the options
    /// do not set a page size.
    #[must_use]
    pub fn new(store: Arc<dyn AsyncObjectStore>, default_max_results: usize) -> Self {
        Self {
            store,
            default_max_results: default_max_results.max(1),
        }
    }

    /// Fetch the single page described by `options`, starting at its marker.
    ///
    /// # Errors
    ///
    /// Returns the store's error, e.g. [`ContainerNotFound`](crate::error::BlobStoreError::ContainerNotFound).
    pub async fn execute(
        &self,
        container: &str,
        options: &ListOptions,
    ) -> BlobStoreResult<PageSet<BlobMetadata>> {
        let request = options.to_request(self.default_max_results);
        let page = self.store.list(container, &request).await?;
        debug!(
            container = %container,
            prefix = ?request.prefix,
            count = page.len(),
            is_truncated = page.is_truncated(),
            "listed page"
        );
        Ok(finish_page(page, options.is_detailed()))
    }

    /// Every page from the options' marker onwards, in marker order.
    ///
    /// The stream only moves forward and ends after the first error.
    #[must_use]
    pub fn pages(
        &self,
        container: &str,
        options: &ListOptions,
    ) -> BoxStream<'static, BlobStoreResult<PageSet<BlobMetadata>>> {
        let store = Arc::clone(&self.store);
        let container = container.to_owned();
        let detailed = options.is_detailed();
        let first = options.to_request(self.default_max_results);

        stream::unfold(Some(first), move |state| {
            let store = Arc::clone(&store);
            let container = container.clone();
            async move {
                let request = state?;
                match store.list(&container, &request).await {
                    Ok(page) => {
                        let next = page
                            .next_marker()
                            .cloned()
                            .map(|marker| request.resume_after(marker));
                        Some((Ok(finish_page(page, detailed)), next))
                    }
                    Err(err) => Some((Err(err), None)),
                }
            }
        })
        .boxed()
    }

    /// Concatenate every page from the options' marker onwards.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any page.
    pub async fn list_all(
        &self,
        container: &str,
        options: &ListOptions,
    ) -> BlobStoreResult<Vec<BlobMetadata>> {
        self.pages(container, options)
            .try_fold(Vec::new(), |mut all, page| async move {
                all.extend(page);
                Ok(all)
            })
            .await
    }
}

fn finish_page(page: PageSet<BlobMetadata>, detailed: bool) -> PageSet<BlobMetadata> {
    if detailed {
        return page;
    }
    page.map(|mut metadata| {
        metadata.user_metadata.clear();
        metadata
    })
}
