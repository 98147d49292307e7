//! `Browser` - debounced, paginated browsing over any [`CatalogSource`].

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use futures::FutureExt;
use tokio::task::JoinSet;

use crate::catalog::{CatalogPage, CatalogSource};
use crate::error::BrowseError;
use crate::fetch::{Completion, FetchOrchestrator, Ticket};
use crate::pagination::DEFAULT_MAX_VISIBLE;
use crate::query::{DEFAULT_DEBOUNCE, FetchQuery, QueryController, QueryMode};

/// Tuning knobs for a [`Browser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseOptions {
    /// Delay between the last keystroke and the search it triggers.
    pub debounce: Duration,
    /// Number of page numbers in the pagination window.
    pub max_visible: u32,
}

impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            max_visible: DEFAULT_MAX_VISIBLE,
        }
    }
}

/// What [`Browser::next_event`] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseEvent {
    /// The typed term settled. `query` is the fetch it triggered, or `None`
    /// when the term was unchanged.
    Committed {
        /// Settled term, as typed.
        term: String,
        /// Fetch issued for it.
        query: Option<FetchQuery>,
    },
    /// The latest fetch succeeded.
    Loaded {
        /// Query the items belong to.
        query: FetchQuery,
        /// Number of distinct items.
        items: usize,
        /// Page count after clamping.
        total_pages: u32,
    },
    /// The latest fetch failed or returned nothing.
    Failed {
        /// Query that failed.
        query: FetchQuery,
        /// Failure shown to the user.
        error: BrowseError,
    },
    /// A superseded fetch finished and was dropped.
    Discarded {
        /// Query of the dropped fetch.
        query: FetchQuery,
    },
}

/// Output of one spawned fetch.
type FetchOutput<I> = (Ticket, FetchQuery, Result<CatalogPage<I>>);

/// Drives one catalog: search term, paging, and the fetches they trigger.
///
/// Fetches run on a [`JoinSet`], so dropping the browser aborts any still in
/// flight and nothing is delivered after teardown.
pub struct Browser<S: CatalogSource> {
    source: Arc<S>,
    options: BrowseOptions,
    query: QueryController,
    fetch: FetchOrchestrator<S::Item>,
    in_flight: JoinSet<FetchOutput<S::Item>>,
}

impl<S: CatalogSource> fmt::Debug for Browser<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("label", &self.source.label())
            .field("options", &self.options)
            .field("query", &self.query)
            .field("latest_seq", &self.fetch.latest_seq())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl<S: CatalogSource> Browser<S> {
    /// Creates an idle browser. Call [`start`](Self::start) to load page 1.
    pub fn new(source: S, options: BrowseOptions) -> Self {
        let label = source.label();
        Self {
            source: Arc::new(source),
            options,
            query: QueryController::new(options.debounce),
            fetch: FetchOrchestrator::new(label),
            in_flight: JoinSet::new(),
        }
    }

    /// Issues the initial discover fetch for the current (empty) term.
    pub fn start(&mut self) {
        let query = self.query.query();
        self.issue(query);
    }

    /// Re-issues the current query, unless one is already loading.
    pub fn reload(&mut self) -> bool {
        if self.query.is_loading() {
            return false;
        }
        let query = self.query.query();
        self.issue(query);
        true
    }

    /// Records a keystroke; the search follows once typing pauses.
    pub fn input(&mut self, term: impl Into<String>) {
        self.query.set_raw_term(term);
    }

    /// Jumps to page `n`. Returns `false` if the request was ignored.
    pub fn set_page(&mut self, n: u32) -> bool {
        let query = self.query.set_page(n);
        self.issue_some(query)
    }

    /// Advances one page. Returns `false` if the request was ignored.
    pub fn next_page(&mut self) -> bool {
        let query = self.query.next_page();
        self.issue_some(query)
    }

    /// Goes back one page. Returns `false` if the request was ignored.
    pub fn prev_page(&mut self) -> bool {
        let query = self.query.prev_page();
        self.issue_some(query)
    }

    /// Waits for the next debounce commit or fetch completion and applies it.
    ///
    /// Cancel-safe, for use inside `tokio::select!`. Never resolves while
    /// nothing is pending.
    pub async fn next_event(&mut self) -> BrowseEvent {
        tokio::select! {
            term = self.query.committed() => {
                let query = self.query.commit(&term);
                if let Some(ref query) = query {
                    self.issue(query.clone());
                }
                BrowseEvent::Committed { term, query }
            }
            Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                match joined {
                    Ok((ticket, query, outcome)) => self.apply(ticket, query, outcome),
                    Err(err) => {
                        // Tasks are only cancelled by dropping the set.
                        tracing::error!(error = %err, "fetch task did not complete");
                        BrowseEvent::Discarded { query: self.query.query() }
                    }
                }
            }
        }
    }

    /// Search term and paging state.
    #[must_use]
    pub const fn state(&self) -> &QueryController {
        &self.query
    }

    /// Result state.
    #[must_use]
    pub const fn fetch(&self) -> &FetchOrchestrator<S::Item> {
        &self.fetch
    }

    /// Pagination window for the current page.
    #[must_use]
    pub fn window(&self) -> Vec<u32> {
        self.query.window(self.options.max_visible)
    }

    /// Discover or search, per the current effective term.
    #[must_use]
    pub fn mode(&self) -> QueryMode {
        self.query.mode()
    }

    /// Plural noun for the listed items.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.source.label()
    }

    /// The catalog being browsed.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of fetches still running, including superseded ones.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn issue_some(&mut self, query: Option<FetchQuery>) -> bool {
        query.is_some_and(|query| {
            self.issue(query);
            true
        })
    }

    fn issue(&mut self, query: FetchQuery) {
        let ticket = self.fetch.begin(&query);
        self.query.set_loading(true);
        let source = Arc::clone(&self.source);
        self.in_flight.spawn(async move {
            let outcome = AssertUnwindSafe(source.fetch_page(&query))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(anyhow!("fetch task panicked")));
            (ticket, query, outcome)
        });
    }

    fn apply(
        &mut self,
        ticket: Ticket,
        query: FetchQuery,
        outcome: Result<CatalogPage<S::Item>>,
    ) -> BrowseEvent {
        match self.fetch.complete(ticket, outcome) {
            Completion::Loaded { items, total_pages } => {
                self.query.set_loading(false);
                self.query.set_total_pages(total_pages);
                BrowseEvent::Loaded {
                    query,
                    items,
                    total_pages: self.query.total_pages(),
                }
            }
            Completion::Failed(error) => {
                // Nothing is listed, so there are no further pages to offer.
                self.query.set_loading(false);
                self.query.set_total_pages(1);
                BrowseEvent::Failed { query, error }
            }
            Completion::Stale => BrowseEvent::Discarded { query },
        }
    }
}
