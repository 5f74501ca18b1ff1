//! Map-like views over a container.
//!
//! A view is scoped by [`ListOptions`](ruststack_blobstore_model::ListOptions):
//! its keys are relative to the scoped directory, so key `"0"` of a view over
//! `apps` is stored as `apps/0`. Single-key operations are one remote call;
//! bulk operations go through the strategies.
//!
//! - [`BlobMap`] holds whole [`Blob`]s, metadata included.
//! - [`InputStreamMap`] holds raw payload [`Bytes`].

mod base;
mod blob_map;
mod input_stream_map;

use bytes::Bytes;
use ruststack_blobstore_model::Blob;

pub use base::BaseBlobMap;
pub use blob_map::BlobMap;
pub use input_stream_map::InputStreamMap;

/// A value a view can store.
pub trait MapValue: Send + Sized + 'static {
    /// Build the value from a stored blob.
    fn from_blob(blob: Blob) -> Self;

    /// Turn the value into a blob stored under `full_key`.
    fn into_blob(self, full_key: String) -> Blob;

    /// The bytes compared by `contains_value`.
    fn payload(&self) -> &[u8];
}

impl MapValue for Blob {
    fn from_blob(blob: Blob) -> Self {
        blob
    }

    fn into_blob(self, full_key: String) -> Blob {
        self.renamed(full_key)
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl MapValue for Bytes {
    fn from_blob(blob: Blob) -> Self {
        blob.payload
    }

    fn into_blob(self, full_key: String) -> Blob {
        Blob::new(full_key, self)
    }

    fn payload(&self) -> &[u8] {
        self
    }
}
