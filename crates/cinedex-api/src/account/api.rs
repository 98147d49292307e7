//! `AccountApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    AuthResponse, Credentials, NewWatchlistEntry, Registration, WatchlistEntry, WatchlistKey,
};

/// Account backend API trait.
///
/// Covers authentication and the per-user watchlist. Non-2xx responses are
/// reported as [`super::AccountApiError`] inside the returned error.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(AccountApi: Send)]
pub trait LocalAccountApi {
    /// Logs in (`POST auth/login`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the credentials.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    /// Registers a new account (`POST auth/register`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the registration.
    async fn register(&self, registration: &Registration) -> Result<AuthResponse>;

    /// Lists a user's watchlist (`GET watchlist/{userId}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn watchlist(&self, user_id: &str) -> Result<Vec<WatchlistEntry>>;

    /// Adds a title to the watchlist (`POST watchlist/add`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn add_to_watchlist(&self, entry: &NewWatchlistEntry) -> Result<()>;

    /// Checks whether a title is on the watchlist (`POST watchlist/check`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn check_watchlist(&self, key: &WatchlistKey) -> Result<bool>;

    /// Removes a title from the watchlist (`DELETE watchlist/remove`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn remove_from_watchlist(&self, key: &WatchlistKey) -> Result<()>;
}
