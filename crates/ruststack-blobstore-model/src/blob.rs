//! Objects with their payload.

use bytes::Bytes;

use crate::DELIMITER;
use crate::metadata::BlobMetadata;

/// An object: metadata plus the full payload.
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_model::Blob;
///
/// let blob = Blob::new("hello.txt", "hello").with_user_metadata("lang", "en");
/// assert_eq!(blob.name(), "hello.txt");
/// assert_eq!(blob.metadata.size, 5);
/// assert_eq!(blob.metadata.user_metadata["lang"], "en");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Descriptor of the object.
    pub metadata: BlobMetadata,
    /// Object bytes.
    pub payload: Bytes,
}

impl Blob {
    /// Create a blob named `name` holding `payload`.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        Self {
            metadata: BlobMetadata::new(name, payload.len() as u64),
            payload,
        }
    }

    /// Create the empty marker object that materialises directory `dir`.
    ///
    /// The marker key is the directory path followed by the delimiter.
    #[must_use]
    pub fn directory_marker(dir: &str) -> Self {
        let trimmed = dir.trim_end_matches(DELIMITER);
        Self::new(format!("{trimmed}{DELIMITER}"), Bytes::new())
    }

    /// Attach a user metadata entry.
    #[must_use]
    pub fn with_user_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.user_metadata.insert(key.into(), value.into());
        self
    }

    /// Full key of the blob.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Rename the blob, keeping payload and user metadata.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = name.into();
        self
    }
}
