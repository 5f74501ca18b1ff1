//! Per-object descriptors returned by listing and head calls.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StorageType
// ---------------------------------------------------------------------------

/// What a listing entry stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageType {
    /// A real object with a payload.
    #[default]
    Blob,
    /// A synthetic pseudo-directory grouping keys that share a path segment.
    RelativePath,
}

impl StorageType {
    /// Return the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "BLOB",
            Self::RelativePath => "RELATIVE_PATH",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BlobMetadata
// ---------------------------------------------------------------------------

/// Descriptor of a single object or pseudo-directory.
///
/// Pseudo-directory entries only carry a `name`; size is zero and the
/// hash/timestamp fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobMetadata {
    /// Full key of the object within its container.
    pub name: String,
    /// Object or pseudo-directory.
    pub kind: StorageType,
    /// Payload size in bytes.
    pub size: u64,
    /// Hex-encoded MD5 of the payload, when the store knows it.
    pub content_md5: Option<String>,
    /// Entity tag as reported by the store (usually the quoted MD5).
    pub etag: Option<String>,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// User-defined metadata.
    #[serde(default)]
    pub user_metadata: HashMap<String, String>,
}

impl BlobMetadata {
    /// Create metadata for an object with the given key and size.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            ..Self::default()
        }
    }

    /// Create a pseudo-directory entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use ruststack_blobstore_model::{BlobMetadata, StorageType};
    ///
    /// let dir = BlobMetadata::directory("photos/2024");
    /// assert_eq!(dir.kind, StorageType::RelativePath);
    /// assert!(dir.is_directory());
    /// ```
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StorageType::RelativePath,
            ..Self::default()
        }
    }

    /// Whether this entry is a pseudo-directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == StorageType::RelativePath
    }

    /// Whether this entry is a real object.
    #[must_use]
    pub fn is_blob(&self) -> bool {
        self.kind == StorageType::Blob
    }
}
