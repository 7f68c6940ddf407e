//! One page of results returned by a cursor-paginated source.

use serde::{Deserialize, Serialize};

/// A page of items plus the continuation state reported by the source.
///
/// `cursor` is the opaque token to pass back for the following page and
/// `has_more` reports whether the source claims more data exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in source order.
    pub items: Vec<T>,
    /// Continuation cursor for the next page, when the source supplied one.
    pub cursor: Option<String>,
    /// Whether the source reported more data after this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Build a page from its parts.
    pub const fn new(items: Vec<T>, cursor: Option<String>, has_more: bool) -> Self {
        Self {
            items,
            cursor,
            has_more,
        }
    }

    /// A page with no items, no cursor and nothing more to fetch.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new(), None, false)
    }

    /// Whether the next page can be requested.
    ///
    /// Both the more-data flag and a cursor are required; a source that says
    /// there is more data without handing back a cursor cannot be continued.
    #[must_use]
    pub const fn can_continue(&self) -> bool {
        self.has_more && self.cursor.is_some()
    }

    /// Transform every item while keeping the continuation state.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            cursor: self.cursor,
            has_more: self.has_more,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
