//! Sorted per-container key storage.
//!
//! [`KeyStore`] keeps objects in a `BTreeMap` so keys are always sorted,
//! which the listing contract and marker-based pagination depend on.

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::Utc;
use ruststack_blobstore_model::{Blob, BlobMetadata, DELIMITER, StorageType};
use tracing::trace;

use crate::checksums::{compute_etag, compute_md5};

// ---------------------------------------------------------------------------
// List result
// ---------------------------------------------------------------------------

/// Result of listing a [`KeyStore`].
#[derive(Debug, Clone)]
pub struct ListResult {
    /// Objects and pseudo-directories, in key order.
    pub entries: Vec<BlobMetadata>,
    /// Last raw key consumed, present only when more entries remain.
    pub next_key: Option<String>,
}

// ---------------------------------------------------------------------------
// KeyStore
// ---------------------------------------------------------------------------

/// Objects of one container, keyed by name.
#[derive(Debug, Default)]
pub struct KeyStore {
    objects: BTreeMap<String, Blob>,
}

impl KeyStore {
    /// Store `blob`, stamping size, hash, entity tag and modification time.
    ///
    /// Returns the entity tag and whether an existing object was replaced.
    pub fn put(&mut self, mut blob: Blob) -> (String, bool) {
        let etag = compute_etag(&blob.payload);
        blob.metadata.size = blob.payload.len() as u64;
        blob.metadata.content_md5 = Some(compute_md5(&blob.payload));
        blob.metadata.etag = Some(etag.clone());
        blob.metadata.last_modified = Some(Utc::now());
        if blob.name().ends_with(DELIMITER) {
            blob.metadata.kind = StorageType::RelativePath;
        }
        trace!(key = %blob.name(), size = blob.metadata.size, "storing object");
        let replaced = self.objects.insert(blob.name().to_owned(), blob).is_some();
        (etag, replaced)
    }

    /// Get an object by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Blob> {
        self.objects.get(key)
    }

    /// Whether `key` exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Remove an object by key. Returns the removed object if any.
    pub fn delete(&mut self, key: &str) -> Option<Blob> {
        self.objects.remove(key)
    }

    /// Number of stored objects, directory markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// List entries under `prefix`, resuming after raw key `start_after`.
    #[must_use]
    pub fn list(
        &self,
        prefix: &str,
        recursive: bool,
        start_after: &str,
        max_results: usize,
    ) -> ListResult {
        list_from_btree(&self.objects, prefix, recursive, start_after, max_results)
    }
}

/// Walk the sorted key range and apply prefix filtering, delimiter grouping
/// and page truncation.
///
/// A pseudo-directory consumes every key of its group at once, so the marker
/// (the last raw key consumed) never falls inside a group and a group is never
/// reported on two pages.
fn list_from_btree(
    objects: &BTreeMap<String, Blob>,
    prefix: &str,
    recursive: bool,
    start_after: &str,
    max_results: usize,
) -> ListResult {
    let lower = if !start_after.is_empty() && start_after >= prefix {
        Bound::Excluded(start_after)
    } else if prefix.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(prefix)
    };

    let mut keys = objects
        .range::<str, _>((lower, Bound::Unbounded))
        .take_while(|(key, _)| key.starts_with(prefix))
        .peekable();

    let mut entries: Vec<BlobMetadata> = Vec::new();
    let mut last_consumed: Option<&str> = None;
    let mut is_truncated = false;

    while let Some((key, blob)) = keys.next() {
        // The directory marker of the listed directory itself.
        if key.as_str() == prefix {
            continue;
        }

        if entries.len() >= max_results {
            is_truncated = true;
            break;
        }

        let after_prefix = &key[prefix.len()..];
        let group_end = if recursive {
            None
        } else {
            after_prefix.find(DELIMITER)
        };

        if let Some(pos) = group_end {
            let dir = &key[..prefix.len() + pos];
            let group = format!("{dir}{DELIMITER}");
            let mut last = key.as_str();
            while let Some((next, _)) = keys.next_if(|(k, _)| k.starts_with(group.as_str())) {
                last = next.as_str();
            }
            entries.push(BlobMetadata::directory(dir));
            last_consumed = Some(last);
        } else if key.ends_with(DELIMITER) {
            entries.push(BlobMetadata::directory(key.trim_end_matches(DELIMITER)));
            last_consumed = Some(key.as_str());
        } else {
            entries.push(blob.metadata.clone());
            last_consumed = Some(key.as_str());
        }
    }

    let next_key = if is_truncated {
        last_consumed.map(ToOwned::to_owned)
    } else {
        None
    };

    ListResult { entries, next_key }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
