//! Catalog browsing core for cinedex.
//!
//! Debounced search-term propagation, a windowed page-index generator and a
//! fetch orchestrator that discards stale responses, tied together by a
//! [`browse::Browser`] that is generic over the catalog being browsed.
//! Also hosts the session, watchlist, details and home-feed operations the
//! CLI builds on.

/// Session login/logout/registration.
pub mod auth;
/// Generic debounced, paginated browser.
pub mod browse;
/// Movie and TV catalog sources.
pub mod catalog;
/// Debounce timer.
pub mod debounce;
/// Title details assembly.
pub mod details;
/// User-facing error taxonomy.
pub mod error;
/// Fetch orchestrator.
pub mod fetch;
/// Home feed.
pub mod home;
/// Pagination window generator.
pub mod pagination;
/// Search term and page state.
pub mod query;
/// Persisted session.
pub mod session;
/// Watchlist operations.
pub mod watchlist;

pub use browse::{BrowseEvent, BrowseOptions, Browser};
pub use catalog::{CatalogItem, CatalogPage, CatalogSource, MovieSource, TvSource};
pub use error::BrowseError;
pub use fetch::{FetchOrchestrator, FetchState};
pub use query::{FetchQuery, QueryController, QueryMode};
pub use session::{Session, SessionStore};
