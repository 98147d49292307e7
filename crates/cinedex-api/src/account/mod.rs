//! Account backend client module.
//!
//! JSON client for the auth and watchlist endpoints of the account backend.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{AccountApi, LocalAccountApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{AccountClient, AccountClientBuilder, DEFAULT_BASE_URL};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    AccountApiError, AccountUser, AuthResponse, Credentials, NewWatchlistEntry, Registration,
    WatchlistEntry, WatchlistKey,
};
