//! Browsing pane state for one forward-only paginated view.
//!
//! A pane only ever moves forward with the stored cursor or restarts from
//! page zero. Each load bumps a generation counter and returns a
//! [`PageRequest`] ticket; [`Pane::apply`] ignores any result whose ticket no
//! longer matches the pane's current selection and generation.

use serde::{Deserialize, Serialize};

use crate::Page;

/// What a pane is currently browsing: a source (deployment) and a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    source: String,
    table: String,
}

impl Selection {
    /// Build a selection for one table of one source.
    pub fn new(source: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            table: table.into(),
        }
    }

    /// Identifier of the source being browsed.
    #[must_use]
    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    /// Table name being browsed.
    #[must_use]
    pub fn table(&self) -> &str {
        self.table.as_str()
    }
}

/// Ticket describing one page fetch issued by a [`Pane`].
///
/// Callers perform the fetch described here and hand the outcome back to
/// [`Pane::apply`] together with this ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Selection active when the request was issued.
    pub selection: Selection,
    /// Cursor to send, or `None` for the first page.
    pub cursor: Option<String>,
    /// Zero-based page index this request will populate.
    pub page: u32,
    /// Pane generation at issue time.
    pub generation: u64,
}

/// Result of handing a fetch outcome back to a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The page replaced the pane contents.
    Applied,
    /// The fetch failed; the error was recorded and prior items were kept.
    Failed,
    /// The ticket was superseded; the pane was left untouched.
    Stale,
}

/// State of one browsing pane.
///
/// # Examples
/// ```
/// use pagination::{ApplyOutcome, Page, Pane, Selection};
///
/// let mut pane: Pane<&str> = Pane::new();
/// let request = pane
///     .select(Selection::new("dep-1", "users"))
///     .expect("selection issues the first request");
/// let page = Page::new(vec!["a"], Some("c1".to_owned()), true);
/// assert_eq!(pane.apply(&request, Ok(page)), ApplyOutcome::Applied);
/// assert_eq!(pane.page(), 0);
/// assert!(pane.next().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane<T> {
    selection: Option<Selection>,
    items: Vec<T>,
    is_loading: bool,
    error: Option<String>,
    cursor: Option<String>,
    has_more: bool,
    page: u32,
    generation: u64,
}

impl<T> Default for Pane<T> {
    fn default() -> Self {
        Self {
            selection: None,
            items: Vec::new(),
            is_loading: false,
            error: None,
            cursor: None,
            has_more: false,
            page: 0,
            generation: 0,
        }
    }
}

impl<T> Pane<T> {
    /// An idle pane with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new selection and issue the first-page request.
    ///
    /// The pane is reset to the empty idle state before the request is
    /// issued, so nothing from the previous table stays visible.
    pub fn select(&mut self, selection: Selection) -> Option<PageRequest> {
        self.reset();
        self.selection = Some(selection);
        self.start()
    }

    /// Drop the selection and reset to the empty idle state.
    pub fn clear(&mut self) {
        self.reset();
        self.selection = None;
    }

    /// Issue a request for `page` using `cursor`.
    ///
    /// Marks the pane as loading and clears any previous error. Returns `None`
    /// when nothing is selected.
    pub fn load(&mut self, cursor: Option<String>, page: u32) -> Option<PageRequest> {
        let selection = self.selection.clone()?;
        self.generation = self.generation.wrapping_add(1);
        self.is_loading = true;
        self.error = None;
        Some(PageRequest {
            selection,
            cursor,
            page,
            generation: self.generation,
        })
    }

    /// Issue a request for the first page.
    pub fn start(&mut self) -> Option<PageRequest> {
        self.load(None, 0)
    }

    /// Reload from the first page with the current selection.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        self.start()
    }

    /// Issue a request for the following page.
    ///
    /// Returns `None`, leaving the pane unchanged, unless the source reported
    /// more data and supplied a cursor.
    pub fn next(&mut self) -> Option<PageRequest> {
        if !self.has_more {
            return None;
        }
        let cursor = self.cursor.clone()?;
        let page = self.page.saturating_add(1);
        self.load(Some(cursor), page)
    }

    /// Go back by restarting from the first page.
    ///
    /// The remote protocol has no backward cursor, so this always lands on
    /// page zero. Returns `None`, leaving the pane unchanged, on page zero.
    pub fn prev(&mut self) -> Option<PageRequest> {
        if self.page == 0 {
            return None;
        }
        self.start()
    }

    /// Apply the outcome of a fetch issued through this pane.
    ///
    /// Outcomes for tickets that no longer match the current selection and
    /// generation are ignored. A failure records the error and keeps the
    /// previously loaded items and page index visible.
    pub fn apply(&mut self, request: &PageRequest, outcome: Result<Page<T>, String>) -> ApplyOutcome {
        if !self.is_current(request) {
            return ApplyOutcome::Stale;
        }
        self.is_loading = false;
        match outcome {
            Ok(page) => {
                self.items = page.items;
                self.cursor = page.cursor;
                self.has_more = page.has_more;
                self.page = request.page;
                self.error = None;
                ApplyOutcome::Applied
            }
            Err(message) => {
                self.error = Some(message);
                ApplyOutcome::Failed
            }
        }
    }

    /// Whether `request` is the latest request issued for the active selection.
    #[must_use]
    pub fn is_current(&self, request: &PageRequest) -> bool {
        request.generation == self.generation
            && self.selection.as_ref() == Some(&request.selection)
    }

    /// Active selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Items on the currently loaded page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Error from the latest failed fetch.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Cursor for the following page.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Whether the source reported more data after the current page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Zero-based index of the currently loaded page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Request generation counter.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.items = Vec::new();
        self.is_loading = false;
        self.error = None;
        self.cursor = None;
        self.has_more = false;
        self.page = 0;
    }
}
