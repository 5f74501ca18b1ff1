//! Listing integration tests: pagination cost, ordering, directory emulation.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use futures::TryStreamExt;
    use ruststack_blobstore_core::BlobStoreConfig;
    use ruststack_blobstore_core::store::AsyncObjectStore;
    use ruststack_blobstore_model::ListOptions;

    use crate::{InstrumentedStore, fixture};

    #[tokio::test]
    async fn test_should_list_in_ceil_n_over_p_calls() {
        for (n, p) in [(1_usize, 1_usize), (7, 3), (20, 10), (25, 10), (100, 7), (5, 1000)] {
            let f = fixture(
                "pages",
                InstrumentedStore::new(),
                BlobStoreConfig::builder().max_results(p).build(),
            )
            .await;
            let keys: Vec<String> = (0..n).map(|i| format!("obj-{i:04}")).collect();
            for key in &keys {
                f.seed(key, "v").await;
            }

            let listed = f
                .context
                .listing()
                .list_all(&f.container, &ListOptions::new())
                .await
                .expect("list");

            assert_eq!(f.store.list_calls(), n.div_ceil(p), "n={n} p={p}");
            let names: Vec<String> = listed.into_iter().map(|m| m.name).collect();
            assert_eq!(names, keys, "n={n} p={p}");
        }
    }

    #[tokio::test]
    async fn test_should_page_forward_through_markers() {
        let f = fixture(
            "forward",
            InstrumentedStore::new(),
            BlobStoreConfig::builder().max_results(4).build(),
        )
        .await;
        for i in 0..10 {
            f.seed(&format!("k{i}"), "v").await;
        }

        let pages: Vec<_> = f
            .context
            .listing()
            .pages(&f.container, &ListOptions::new())
            .try_collect()
            .await
            .expect("pages");
        let sizes: Vec<usize> = pages.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert!(pages.last().is_some_and(|p| !p.is_truncated()));

        let mut seen = BTreeSet::new();
        for page in &pages {
            for metadata in page {
                assert!(seen.insert(metadata.name.clone()), "duplicate {}", metadata.name);
            }
        }
        assert_eq!(seen.len(), 10);
    }

    #[tokio::test]
    async fn test_should_group_pseudo_directories_across_pages() {
        let f = fixture(
            "groups",
            InstrumentedStore::new(),
            BlobStoreConfig::builder().max_results(2).build(),
        )
        .await;
        for key in ["a", "b/1", "b/2", "b/3", "c", "d/x/y", "e"] {
            f.seed(key, "v").await;
        }

        let listed = f
            .context
            .listing()
            .list_all(&f.container, &ListOptions::new())
            .await
            .expect("list");
        let entries: Vec<(&str, bool)> = listed
            .iter()
            .map(|m| (m.name.as_str(), m.is_directory()))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("a", false),
                ("b", true),
                ("c", false),
                ("d", true),
                ("e", false)
            ]
        );
        assert_eq!(f.store.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_should_emulate_directories_like_map_views() {
        let f = fixture("directory", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        let root = f.context.input_stream_map(&f.container);
        let root_recursive = f
            .context
            .input_stream_map_with(&f.container, ListOptions::recursive());
        let in_directory = f
            .context
            .input_stream_map_with(&f.container, ListOptions::in_directory("apps"));

        let digits: BTreeSet<String> = (0..10).map(|i| i.to_string()).collect();

        f.store
            .create_directory(&f.container, "apps")
            .await
            .expect("mkdir");
        for i in 0..10 {
            root.put_string(&i.to_string(), "root").await.expect("put");
        }
        assert_eq!(root.len().await.expect("len"), 10);
        assert_eq!(root.key_set().await.expect("keys"), digits);
        assert_eq!(root_recursive.len().await.expect("len"), 10);
        assert_eq!(root_recursive.key_set().await.expect("keys"), digits);
        assert_eq!(in_directory.len().await.expect("len"), 0);

        for i in 0..10 {
            in_directory
                .put_string(&i.to_string(), "nested")
                .await
                .expect("put");
        }
        assert_eq!(root.len().await.expect("len"), 10);
        assert_eq!(root.key_set().await.expect("keys"), digits);
        assert_eq!(root_recursive.len().await.expect("len"), 20);
        let mut all = digits.clone();
        all.extend((0..10).map(|i| format!("apps/{i}")));
        assert_eq!(root_recursive.key_set().await.expect("keys"), all);
        assert_eq!(in_directory.len().await.expect("len"), 10);
        assert_eq!(in_directory.key_set().await.expect("keys"), digits);

        f.store
            .create_directory(&f.container, "apps/apps")
            .await
            .expect("mkdir");
        assert_eq!(root.len().await.expect("len"), 10);
        assert_eq!(root_recursive.len().await.expect("len"), 20);
        assert_eq!(in_directory.len().await.expect("len"), 10);

        root.clear().await.expect("clear root");
        assert_eq!(root.len().await.expect("len"), 0);
        assert_eq!(root_recursive.len().await.expect("len"), 10);
        assert_eq!(in_directory.len().await.expect("len"), 10);

        in_directory.clear().await.expect("clear directory");
        assert_eq!(root.len().await.expect("len"), 0);
        assert_eq!(root_recursive.len().await.expect("len"), 0);
        assert_eq!(in_directory.len().await.expect("len"), 0);
    }

    #[tokio::test]
    async fn test_should_misclassify_keys_containing_delimiter() {
        let f = fixture("delimiter", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        f.seed("2024/report.txt", "v").await;

        let page = f
            .context
            .input_stream_map(&f.container)
            .list(None)
            .await
            .expect("list");
        assert_eq!(page.len(), 1);
        assert_eq!(page.items()[0].name, "2024");
        assert!(page.items()[0].is_directory());
    }
}
