//! Data types for the RustStack blob store collection views.
//!
//! These types carry no I/O. They describe what a remote object store returns
//! from a listing call ([`BlobMetadata`], [`PageSet`], [`Marker`]), what a
//! caller asks for ([`ListOptions`], [`ListRequest`]), and the objects
//! themselves ([`Blob`]).

mod blob;
mod metadata;
mod options;
mod page;

pub use blob::Blob;
pub use metadata::{BlobMetadata, StorageType};
pub use options::{ListOptions, ListRequest, ListScope};
pub use page::{Marker, PageSet};

/// Path delimiter used to emulate directories over a flat key namespace.
pub const DELIMITER: char = '/';
