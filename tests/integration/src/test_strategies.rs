//! Batch strategy integration tests: count, contains value, clear.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ruststack_blobstore_core::BlobStoreConfig;
    use ruststack_blobstore_core::retry::BackoffConfig;
    use ruststack_blobstore_model::{Blob, ListOptions};

    use crate::{InstrumentedStore, fixture};

    #[tokio::test]
    async fn test_should_not_contain_any_value_when_empty() {
        let f = fixture("empty", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        let found = f
            .context
            .contains_value()
            .execute(&f.container, &ListOptions::recursive(), b"anything")
            .await
            .expect("search");
        assert!(!found);
        assert_eq!(f.store.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_should_only_download_plausible_candidates() {
        let f = fixture(
            "candidates",
            InstrumentedStore::new(),
            BlobStoreConfig::builder().max_results(3).build(),
        )
        .await;
        for i in 0..10 {
            f.seed(&format!("k{i}"), &format!("value-{i}")).await;
        }
        f.seed("long", "a much longer value").await;

        let search = f.context.contains_value();
        assert!(
            search
                .execute(&f.container, &ListOptions::new(), b"value-7")
                .await
                .expect("search")
        );
        // Only the object with a matching hash is read.
        assert_eq!(f.store.get_calls(), 1);

        assert!(
            !search
                .execute(&f.container, &ListOptions::new(), b"value-x")
                .await
                .expect("search")
        );
        assert_eq!(f.store.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_should_stop_at_matching_batch_without_listed_hashes() {
        let f = fixture(
            "nohash",
            InstrumentedStore::new().without_listed_hashes(),
            BlobStoreConfig::builder().user_threads(2).build(),
        )
        .await;
        for i in 0..10 {
            f.seed(&format!("k{i}"), &format!("v{i}")).await;
        }

        let found = f
            .context
            .contains_value()
            .execute(&f.container, &ListOptions::new(), b"v3")
            .await
            .expect("search");
        assert!(found);
        // Every same-size object is a candidate; batches of two stop at k2, k3.
        assert_eq!(f.store.get_calls(), 4);
    }

    #[tokio::test]
    async fn test_should_count_pages_until_exhausted() {
        let f = fixture(
            "count",
            InstrumentedStore::new(),
            BlobStoreConfig::builder().max_results(10).build(),
        )
        .await;
        for i in 0..45 {
            f.seed(&format!("k{i:02}"), "v").await;
        }
        let count = f
            .context
            .count()
            .execute(&f.container, &ListOptions::new())
            .await
            .expect("count");
        assert_eq!(count, 45);
        assert_eq!(f.store.list_calls(), 5);
    }

    #[tokio::test]
    async fn test_should_clear_then_noop() {
        let f = fixture("clear", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        for i in 0..30 {
            f.seed(&format!("k{i:02}"), "v").await;
        }
        let clear = f.context.clear();

        let first = clear
            .execute(&f.container, &ListOptions::recursive())
            .await
            .expect("clear");
        assert!(first.is_success());
        assert_eq!(first.len(), 30);
        assert_eq!(f.store.inner().object_count(&f.container).expect("count"), 0);

        let second = clear
            .execute(&f.container, &ListOptions::recursive())
            .await
            .expect("clear again");
        assert!(second.is_success());
        assert!(second.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_verify_clear_with_bounded_polling() {
        let f = fixture(
            "verify",
            InstrumentedStore::new().with_latency(Duration::from_millis(100)),
            BlobStoreConfig::default(),
        )
        .await;
        for i in 0..15 {
            f.seed(&format!("k{i:02}"), "v").await;
        }

        let deleted = f
            .context
            .clear()
            .execute_and_verify(&f.container, &ListOptions::new(), &BackoffConfig::default())
            .await
            .expect("verified");
        assert_eq!(deleted, 15);
    }

    #[tokio::test]
    async fn test_should_put_many_blobs() {
        let f = fixture("putmany", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        let result = f
            .context
            .put_blobs()
            .execute(
                &f.container,
                (0..20).map(|i| Blob::new(format!("dir/k{i:02}"), "v")),
            )
            .await;
        assert!(result.is_success());
        assert!(result.successes().values().all(|etag| etag.starts_with('"')));

        let count = f
            .context
            .count()
            .execute(&f.container, &ListOptions::in_directory("dir"))
            .await
            .expect("count");
        assert_eq!(count, 20);
    }
}
