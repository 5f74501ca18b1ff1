//! Paginated listing results.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// Opaque continuation marker returned by a paginated listing call.
///
/// Only the store that issued a marker knows how to interpret it. Callers pass
/// it back unchanged to resume listing after the previous page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(String);

impl Marker {
    /// Wrap a store-issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the marker and return the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// PageSet
// ---------------------------------------------------------------------------

/// One page of a listing: ordered items plus the marker for the next page.
///
/// `next_marker` is present if and only if more pages exist.
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_model::{Marker, PageSet};
///
/// let page = PageSet::new(vec![1, 2, 3], Some(Marker::new("3")));
/// assert!(page.is_truncated());
/// assert_eq!(page.len(), 3);
///
/// let last = PageSet::new(vec![4], None);
/// assert!(!last.is_truncated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSet<T> {
    items: Vec<T>,
    next_marker: Option<Marker>,
}

impl<T> PageSet<T> {
    /// Create a page from its items and optional continuation marker.
    #[must_use]
    pub fn new(items: Vec<T>, next_marker: Option<Marker>) -> Self {
        Self { items, next_marker }
    }

    /// A final page with no items.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Items on this page, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Marker to resume after this page, if more pages exist.
    #[must_use]
    pub fn next_marker(&self) -> Option<&Marker> {
        self.next_marker.as_ref()
    }

    /// Whether more pages follow this one.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.next_marker.is_some()
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Split the page into its items and marker.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<Marker>) {
        (self.items, self.next_marker)
    }

    /// Transform every item, keeping the marker.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageSet<U> {
        PageSet {
            items: self.items.into_iter().map(f).collect(),
            next_marker: self.next_marker,
        }
    }
}

impl<T> Default for PageSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> IntoIterator for PageSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PageSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
