//! Strategies behind the collection views.
//!
//! Each strategy implements one bulk operation against an
//! [`AsyncObjectStore`](crate::store::AsyncObjectStore): paginated listing,
//! and the batch read, write, search, count and delete built on top of it.
//! Batch strategies fan out per key through a
//! [`ScatterGather`](crate::executor::ScatterGather) executor.

mod clear;
mod contains_value;
mod count;
mod get_blobs;
mod list;
mod put_blobs;

pub use clear::ClearListStrategy;
pub use contains_value::ContainsValueInListStrategy;
pub use count::CountListStrategy;
pub use get_blobs::GetBlobsInListStrategy;
pub use list::ListingStrategy;
pub use put_blobs::PutBlobsStrategy;
