//! `FetchOrchestrator` - issues fetches and keeps only the latest outcome.

use std::collections::HashSet;

use anyhow::Result;

use crate::catalog::{CatalogItem, CatalogPage};
use crate::error::BrowseError;
use crate::query::FetchQuery;

/// Lifecycle of the visible result set.
#[derive(Debug, Clone)]
pub enum FetchState<I> {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight; previous results are not shown.
    Loading,
    /// The latest fetch succeeded with at least one item.
    Success(CatalogPage<I>),
    /// The latest fetch failed or came back empty.
    Failure(BrowseError),
}

/// Handle for one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
}

impl Ticket {
    /// Sequence number, increasing with each issued fetch.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.seq
    }
}

/// What [`FetchOrchestrator::complete`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Items were committed.
    Loaded {
        /// Number of distinct items kept.
        items: usize,
        /// Page count reported with them.
        total_pages: u32,
    },
    /// A failure was committed.
    Failed(BrowseError),
    /// The outcome belonged to a superseded fetch and was dropped.
    Stale,
}

/// Tracks in-flight fetches by sequence number.
///
/// Only the most recently issued fetch may change the state; completions of
/// earlier ones are discarded regardless of arrival order.
#[derive(Debug)]
pub struct FetchOrchestrator<I> {
    label: &'static str,
    state: FetchState<I>,
    latest_seq: u64,
}

impl<I: CatalogItem> FetchOrchestrator<I> {
    /// Creates an idle orchestrator. `label` names the items in messages.
    #[must_use]
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            state: FetchState::Idle,
            latest_seq: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FetchState<I> {
        &self.state
    }

    /// Committed items; empty unless the state is `Success`.
    #[must_use]
    pub fn items(&self) -> &[I] {
        match &self.state {
            FetchState::Success(page) => &page.items,
            _ => &[],
        }
    }

    /// User-facing error message, if the latest fetch failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failure(error) => Some(error.user_message()),
            _ => None,
        }
    }

    /// Whether the latest fetch is still in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    /// Sequence number of the most recently issued fetch (0 before any).
    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Starts a fetch for `query`, superseding any in flight.
    pub fn begin(&mut self, query: &FetchQuery) -> Ticket {
        self.latest_seq = self.latest_seq.saturating_add(1);
        self.state = FetchState::Loading;
        tracing::debug!(
            seq = self.latest_seq,
            term = %query.term,
            page = query.page,
            "fetch started"
        );
        Ticket {
            seq: self.latest_seq,
        }
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<CatalogPage<I>>) -> Completion {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale response"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(page) => {
                let total_pages = page.total_pages;
                let items = dedup_by_id(page.items);
                if items.is_empty() {
                    let error = BrowseError::empty(self.label);
                    self.state = FetchState::Failure(error.clone());
                    return Completion::Failed(error);
                }
                let count = items.len();
                self.state = FetchState::Success(CatalogPage { items, total_pages });
                Completion::Loaded {
                    items: count,
                    total_pages,
                }
            }
            Err(err) => {
                tracing::warn!(
                    label = self.label,
                    error = %format_args!("{err:#}"),
                    "fetch failed"
                );
                let error = BrowseError::network(self.label);
                self.state = FetchState::Failure(error.clone());
                Completion::Failed(error)
            }
        }
    }
}

/// Drops repeated ids, keeping the first occurrence.
fn dedup_by_id<I: CatalogItem>(items: Vec<I>) -> Vec<I> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.id()))
        .collect()
}
