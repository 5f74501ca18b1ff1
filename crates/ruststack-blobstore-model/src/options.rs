//! Listing options.
//!
//! [`ListOptions`] is what a collection view is scoped by; [`ListRequest`] is
//! the single remote listing call derived from it.

use crate::DELIMITER;
use crate::page::Marker;

// ---------------------------------------------------------------------------
// ListScope
// ---------------------------------------------------------------------------

/// Which part of a container a listing covers.
///
/// A directory scope and recursive listing are mutually exclusive: there is
/// deliberately no variant for "recursive under a directory".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ListScope {
    /// Top level of the container. Keys containing the delimiter collapse
    /// into pseudo-directories.
    #[default]
    Root,
    /// Direct children of a pseudo-directory (path without trailing delimiter).
    Directory(String),
    /// Every key in the container, flattened.
    Recursive,
}

// ---------------------------------------------------------------------------
// ListOptions
// ---------------------------------------------------------------------------

/// Options for listing a container.
///
/// # Examples
///
/// ```
/// use ruststack_blobstore_model::{ListOptions, ListScope};
///
/// let opts = ListOptions::in_directory("apps/").max_results(100).with_details();
/// assert_eq!(opts.scope(), &ListScope::Directory("apps".to_owned()));
/// assert_eq!(opts.prefix().as_deref(), Some("apps/"));
/// assert!(!opts.is_recursive());
///
/// let all = ListOptions::recursive();
/// assert!(all.is_recursive());
/// assert!(all.directory().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    scope: ListScope,
    marker: Option<Marker>,
    max_results: Option<usize>,
    detailed: bool,
}

impl ListOptions {
    /// List the top level of the container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List the direct children of directory `dir`.
    ///
    /// Leading and trailing delimiters are ignored; an empty path is the root.
    #[must_use]
    pub fn in_directory(dir: impl AsRef<str>) -> Self {
        let path = dir.as_ref().trim_matches(DELIMITER);
        let scope = if path.is_empty() {
            ListScope::Root
        } else {
            ListScope::Directory(path.to_owned())
        };
        Self {
            scope,
            ..Self::default()
        }
    }

    /// List every key in the container, without directory grouping.
    #[must_use]
    pub fn recursive() -> Self {
        Self {
            scope: ListScope::Recursive,
            ..Self::default()
        }
    }

    /// Resume after the given marker.
    #[must_use]
    pub fn after_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Limit the number of entries per page.
    #[must_use]
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Keep user metadata in listing results.
    #[must_use]
    pub fn with_details(mut self) -> Self {
        self.detailed = true;
        self
    }

    /// The listing scope.
    #[must_use]
    pub fn scope(&self) -> &ListScope {
        &self.scope
    }

    /// Directory path when scoped to a directory.
    #[must_use]
    pub fn directory(&self) -> Option<&str> {
        match &self.scope {
            ListScope::Directory(dir) => Some(dir),
            ListScope::Root | ListScope::Recursive => None,
        }
    }

    /// Whether the listing is flattened.
    #[must_use]
    pub fn is_recursive(&self) -> bool {
        self.scope == ListScope::Recursive
    }

    /// Marker to resume from.
    #[must_use]
    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Requested page size.
    #[must_use]
    pub fn max_results_value(&self) -> Option<usize> {
        self.max_results
    }

    /// Whether user metadata is kept.
    #[must_use]
    pub fn is_detailed(&self) -> bool {
        self.detailed
    }

    /// Key prefix every listed key must start with.
    #[must_use]
    pub fn prefix(&self) -> Option<String> {
        self.directory().map(|dir| format!("{dir}{DELIMITER}"))
    }

    /// Translate a view-relative key into the full key in the container.
    #[must_use]
    pub fn full_key(&self, key: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_owned(),
        }
    }

    /// Translate a full key into a view-relative key.
    ///
    /// Returns `None` for keys outside the directory scope.
    #[must_use]
    pub fn relative_key<'a>(&self, full: &'a str) -> Option<&'a str> {
        match self.directory() {
            Some(dir) => full
                .strip_prefix(dir)
                .and_then(|rest| rest.strip_prefix(DELIMITER))
                .filter(|rest| !rest.is_empty()),
            None => Some(full),
        }
    }

    /// Build the remote listing request, falling back to `default_max_results`.
    #[must_use]
    pub fn to_request(&self, default_max_results: usize) -> ListRequest {
        ListRequest {
            prefix: self.prefix(),
            recursive: self.is_recursive(),
            marker: self.marker.clone(),
            max_results: self.max_results.unwrap_or(default_max_results).max(1),
        }
    }
}

// ---------------------------------------------------------------------------
// ListRequest
// ---------------------------------------------------------------------------

/// A single paginated listing call against a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Only keys starting with this prefix are listed.
    pub prefix: Option<String>,
    /// Flatten instead of grouping by the first delimiter after the prefix.
    pub recursive: bool,
    /// Resume strictly after this marker.
    pub marker: Option<Marker>,
    /// Upper bound on entries (objects and pseudo-directories) in the page.
    pub max_results: usize,
}

impl ListRequest {
    /// Same request, resumed after `marker`.
    #[must_use]
    pub fn resume_after(&self, marker: Marker) -> Self {
        Self {
            marker: Some(marker),
            ..self.clone()
        }
    }
}
