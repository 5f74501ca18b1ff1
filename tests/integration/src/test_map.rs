//! Map view integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use bytes::Bytes;
    use ruststack_blobstore_core::{
        AsyncObjectStore, BlobStoreConfig, BlobStoreContext, TransientBlobStore,
    };
    use ruststack_blobstore_model::{Blob, ListOptions};

    use crate::{InstrumentedStore, fixture};

    fn five_strings() -> BTreeMap<String, String> {
        ["one", "two", "three", "four", "five"]
            .into_iter()
            .map(|s| (s.to_owned(), format!("apple-{s}")))
            .collect()
    }

    #[tokio::test]
    async fn test_should_behave_like_a_map() {
        let f = fixture("map", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        let map = f.context.input_stream_map(&f.container);
        assert!(map.is_empty().await.expect("empty"));

        for (key, value) in five_strings() {
            assert!(map.put_string(&key, &value).await.expect("put").is_none());
        }
        assert_eq!(map.len().await.expect("len"), 5);
        assert!(map.contains_key("three").await.expect("contains"));
        assert!(!map.contains_key("six").await.expect("contains"));
        assert!(
            map.contains_value(&Bytes::from_static(b"apple-four"))
                .await
                .expect("contains value")
        );

        let entries = map.entry_set().await.expect("entries");
        let expected: BTreeMap<String, Bytes> = five_strings()
            .into_iter()
            .map(|(k, v)| (k, Bytes::from(v)))
            .collect();
        assert_eq!(entries, expected);

        let previous = map
            .put_string("one", "pear")
            .await
            .expect("overwrite")
            .expect("previous");
        assert_eq!(previous, Bytes::from_static(b"apple-one"));
        assert_eq!(map.len().await.expect("len"), 5);

        let removed = map.remove("two").await.expect("remove").expect("removed");
        assert_eq!(removed, Bytes::from_static(b"apple-two"));
        assert_eq!(map.len().await.expect("len"), 4);
        assert!(map.remove("two").await.expect("remove").is_none());
    }

    #[tokio::test]
    async fn test_should_put_all_concurrently() {
        let f = fixture("putall", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        let map = f.context.input_stream_map_with(&f.container, ListOptions::in_directory("bulk"));

        let result = map
            .put_all(five_strings().into_iter().map(|(k, v)| (k, Bytes::from(v))))
            .await;
        assert!(result.is_success());
        assert!(result.successes().contains_key("three"));
        assert_eq!(f.store.inner().object_count(&f.container).expect("count"), 5);
        assert_eq!(map.len().await.expect("len"), 5);
    }

    #[tokio::test]
    async fn test_should_keep_blob_metadata_in_blob_map() {
        let f = fixture("blobmap", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        let map = f.context.blob_map(&f.container);

        let blob = map.new_blob("doc", "content").with_user_metadata("author", "me");
        map.put("doc", blob).await.expect("put");

        let stored = map.get("doc").await.expect("get").expect("present");
        assert_eq!(stored.metadata.user_metadata["author"], "me");
        assert!(stored.metadata.content_md5.is_some());

        let page = map.list(None).await.expect("list");
        assert!(page.items()[0].user_metadata.is_empty());

        let detailed = f
            .context
            .blob_map_with(&f.container, ListOptions::new().with_details());
        let page = detailed.list(None).await.expect("list");
        assert_eq!(page.items()[0].user_metadata["author"], "me");
    }

    #[tokio::test]
    async fn test_should_replace_on_create_only_store() {
        let store = Arc::new(TransientBlobStore::builder().overwrite(false).build());
        store.create_container("create-only").await.expect("create");
        let context = BlobStoreContext::new(store, BlobStoreConfig::default());

        let map = context.blob_map("create-only");
        map.put("k", Blob::new("k", "1")).await.expect("put");
        let previous = map
            .put("k", Blob::new("k", "2"))
            .await
            .expect("replace")
            .expect("previous");
        assert_eq!(previous.payload, Bytes::from_static(b"1"));

        let current = map.get("k").await.expect("get").expect("present");
        assert_eq!(current.payload, Bytes::from_static(b"2"));
    }

    #[tokio::test]
    async fn test_should_snapshot_entry_set() {
        let f = fixture("snapshot", InstrumentedStore::new(), BlobStoreConfig::default()).await;
        let map = f.context.input_stream_map(&f.container);
        map.put_string("a", "1").await.expect("put");

        let snapshot = map.entry_set().await.expect("entries");
        map.put_string("b", "2").await.expect("put");
        map.remove("a").await.expect("remove");

        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(map.key_set().await.expect("keys").into_iter().collect::<Vec<_>>(), vec!["b"]);
    }
}
