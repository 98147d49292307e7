//! `QueryController` - search term, page and page-count state.

use std::time::Duration;

use crate::debounce::Debouncer;
use crate::pagination::page_window;

/// Default delay between the last keystroke and the search it triggers.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Hard cap on addressable pages imposed by the catalog API.
pub const MAX_TOTAL_PAGES: u32 = 500;

/// Which endpoint a query is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// No search term: popular/trending listing.
    Discover,
    /// Free-text search.
    Search,
}

/// The effective `(term, page)` pair a fetch is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    /// Trimmed search term; empty means discover.
    pub term: String,
    /// 1-based page number.
    pub page: u32,
}

impl FetchQuery {
    /// Creates a query, trimming the term.
    pub fn new(term: impl AsRef<str>, page: u32) -> Self {
        Self {
            term: term.as_ref().trim().to_owned(),
            page,
        }
    }

    /// Discover for an empty term, search otherwise.
    #[must_use]
    pub fn mode(&self) -> QueryMode {
        if self.term.trim().is_empty() {
            QueryMode::Discover
        } else {
            QueryMode::Search
        }
    }
}

/// Tracks the raw and debounced search term together with paging state.
///
/// Every accepted change to `(debounced_term, page)` yields exactly one
/// [`FetchQuery`]; rejected or redundant changes yield `None`.
#[derive(Debug)]
pub struct QueryController {
    raw_term: String,
    debounced_term: String,
    page: u32,
    total_pages: u32,
    loading: bool,
    debouncer: Debouncer<String>,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl QueryController {
    /// Creates a controller with an empty term on page 1 of 1.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            raw_term: String::new(),
            debounced_term: String::new(),
            page: 1,
            total_pages: 1,
            loading: false,
            debouncer: Debouncer::new(delay),
        }
    }

    /// Term as typed.
    #[must_use]
    pub fn raw_term(&self) -> &str {
        &self.raw_term
    }

    /// Term the current results are for.
    #[must_use]
    pub fn debounced_term(&self) -> &str {
        &self.debounced_term
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages reported by the last successful fetch.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a typed term is still waiting on the debounce delay.
    #[must_use]
    pub const fn is_debouncing(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Current effective query.
    #[must_use]
    pub fn query(&self) -> FetchQuery {
        FetchQuery {
            term: self.debounced_term.clone(),
            page: self.page,
        }
    }

    /// Mode of the current effective query.
    #[must_use]
    pub fn mode(&self) -> QueryMode {
        self.query().mode()
    }

    /// Stores the typed term and restarts the debounce countdown.
    pub fn set_raw_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.raw_term.clone_from(&term);
        self.debouncer.schedule(term);
    }

    /// Waits for the next debounced term. Cancel-safe.
    pub async fn committed(&mut self) -> String {
        self.debouncer.committed().await
    }

    /// Applies a debounced term.
    ///
    /// A changed term resets the page to 1 and yields the new query; the
    /// same term again yields `None`.
    pub fn commit(&mut self, term: &str) -> Option<FetchQuery> {
        let term = term.trim();
        if term == self.debounced_term {
            return None;
        }
        term.clone_into(&mut self.debounced_term);
        self.page = 1;
        Some(self.query())
    }

    /// Moves to page `n`.
    ///
    /// Ignored when `n` is outside `1..=total_pages`, equals the current
    /// page, or a fetch is loading.
    pub fn set_page(&mut self, n: u32) -> Option<FetchQuery> {
        if self.loading || n == self.page || !(1..=self.total_pages).contains(&n) {
            return None;
        }
        self.page = n;
        Some(self.query())
    }

    /// Moves to the following page, if any.
    pub fn next_page(&mut self) -> Option<FetchQuery> {
        self.set_page(self.page.checked_add(1)?)
    }

    /// Moves to the preceding page, if any.
    pub fn prev_page(&mut self) -> Option<FetchQuery> {
        self.set_page(self.page.checked_sub(1)?)
    }

    /// Marks a fetch as started or settled.
    pub const fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Records the page count, clamped to `1..=500` and never below the
    /// current page.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.clamp(1, MAX_TOTAL_PAGES).max(self.page);
    }

    /// Page window for the current state.
    #[must_use]
    pub fn window(&self, max_visible: u32) -> Vec<u32> {
        page_window(self.page, self.total_pages, max_visible)
    }
}
