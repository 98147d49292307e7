//! Watchlist operations for the logged-in user.

use anyhow::Result;
use cinedex_api::MediaType;
use cinedex_api::account::{AccountApi, NewWatchlistEntry, WatchlistEntry, WatchlistKey};
use tracing::instrument;

use crate::error::BrowseError;
use crate::session::Session;

/// Shown when a watchlist operation is attempted while logged out.
pub const LOGIN_REQUIRED: &str = "Please log in to view your watchlist.";

const FETCH_FAILED: &str = "Failed to fetch watchlist. Please try again later.";
const ADD_FAILED: &str = "Failed to add to watchlist. Please try again.";
const REMOVE_FAILED: &str = "Failed to remove from watchlist. Please try again.";

/// A title to be added to the watchlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistTitle {
    /// TMDB id.
    pub tmdb_id: u64,
    /// Movie or TV.
    pub media_type: MediaType,
    /// Display title.
    pub title: String,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

fn require_user(session: &Session, message: &str) -> Result<String> {
    session
        .user_id()
        .map(str::to_owned)
        .ok_or_else(|| BrowseError::validation(message).into())
}

fn network(err: &anyhow::Error, message: &str) -> anyhow::Error {
    tracing::warn!(error = %format_args!("{err:#}"), "watchlist request failed");
    BrowseError::Network {
        message: String::from(message),
    }
    .into()
}

/// Lists the user's watchlist.
///
/// # Errors
///
/// [`BrowseError::Validation`] when logged out, [`BrowseError::Network`]
/// when the backend request fails.
#[instrument(skip_all)]
pub async fn list<A: AccountApi>(api: &A, session: &Session) -> Result<Vec<WatchlistEntry>> {
    let user_id = require_user(session, LOGIN_REQUIRED)?;
    api.watchlist(&user_id)
        .await
        .map_err(|err| network(&err, FETCH_FAILED))
}

/// Adds a title to the user's watchlist.
///
/// # Errors
///
/// [`BrowseError::Validation`] when logged out, [`BrowseError::Network`]
/// when the backend request fails.
#[instrument(skip_all, fields(tmdb_id = title.tmdb_id, media_type = %title.media_type))]
pub async fn add<A: AccountApi>(api: &A, session: &Session, title: &WatchlistTitle) -> Result<()> {
    let user_id = require_user(session, LOGIN_REQUIRED)?;
    let entry = NewWatchlistEntry {
        user_id,
        tmdb_id: title.tmdb_id.to_string(),
        media_type: title.media_type,
        title: title.title.clone(),
        poster_path: title.poster_path.clone(),
        backdrop_path: title.backdrop_path.clone(),
        extra_details: serde_json::Value::Object(serde_json::Map::new()),
    };
    api.add_to_watchlist(&entry)
        .await
        .map_err(|err| network(&err, ADD_FAILED))?;
    tracing::info!("added to watchlist");
    Ok(())
}

/// Whether a title is on the user's watchlist. Always `false` when logged out.
///
/// # Errors
///
/// [`BrowseError::Network`] when the backend request fails.
#[instrument(skip_all, fields(tmdb_id = tmdb_id, media_type = %media_type))]
pub async fn check<A: AccountApi>(
    api: &A,
    session: &Session,
    media_type: MediaType,
    tmdb_id: u64,
) -> Result<bool> {
    let Some(user_id) = session.user_id() else {
        return Ok(false);
    };
    let key = WatchlistKey::new(user_id, tmdb_id, media_type);
    api.check_watchlist(&key)
        .await
        .map_err(|err| network(&err, FETCH_FAILED))
}

/// Removes a title from the user's watchlist.
///
/// # Errors
///
/// [`BrowseError::Validation`] when logged out, [`BrowseError::Network`]
/// when the backend request fails.
#[instrument(skip_all, fields(tmdb_id = tmdb_id, media_type = %media_type))]
pub async fn remove<A: AccountApi>(
    api: &A,
    session: &Session,
    media_type: MediaType,
    tmdb_id: u64,
) -> Result<()> {
    let user_id = require_user(session, LOGIN_REQUIRED)?;
    let key = WatchlistKey::new(user_id, tmdb_id, media_type);
    api.remove_from_watchlist(&key)
        .await
        .map_err(|err| network(&err, REMOVE_FAILED))?;
    tracing::info!("removed from watchlist");
    Ok(())
}
