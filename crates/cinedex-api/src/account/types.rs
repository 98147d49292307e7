//! Account backend request and response types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::media::MediaType;

/// Accepts an identifier sent either as a JSON string or a JSON number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
    })
}

// --- Auth ---

/// Body of `POST auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body of `POST auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Response from `auth/login` and `auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    /// Session token (login only).
    #[serde(default)]
    pub token: Option<String>,
    /// Authenticated user (login only).
    #[serde(default)]
    pub user: Option<AccountUser>,
    /// Informational message.
    #[serde(default)]
    pub message: Option<String>,
}

/// A user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUser {
    /// User ID (string or numeric on the wire).
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// --- Watchlist ---

/// Identifies one watchlist entry (`watchlist/check`, `watchlist/remove`).
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistKey {
    /// Owner user ID.
    pub user_id: String,
    /// TMDB ID, sent as a string.
    pub tmdb_id: String,
    /// Media type.
    pub media_type: MediaType,
}

impl WatchlistKey {
    /// Creates a key for the given user and title.
    pub fn new(user_id: impl Into<String>, tmdb_id: u64, media_type: MediaType) -> Self {
        Self {
            user_id: user_id.into(),
            tmdb_id: tmdb_id.to_string(),
            media_type,
        }
    }
}

/// Body of `POST watchlist/add`.
#[derive(Debug, Clone, Serialize)]
pub struct NewWatchlistEntry {
    /// Owner user ID.
    pub user_id: String,
    /// TMDB ID, sent as a string.
    pub tmdb_id: String,
    /// Media type.
    pub media_type: MediaType,
    /// Title (movie title or series name).
    pub title: String,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Free-form extra data, always an object.
    pub extra_details: serde_json::Value,
}

/// A stored watchlist entry.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistEntry {
    /// TMDB ID (string or numeric on the wire).
    #[serde(deserialize_with = "string_or_number")]
    pub tmdb_id: String,
    /// Media type.
    pub media_type: MediaType,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Response from `GET watchlist/{userId}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct WatchlistResponse {
    /// Entries.
    #[serde(default)]
    pub watchlist: Vec<WatchlistEntry>,
}

/// Response from `POST watchlist/check`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WatchlistStatus {
    /// Whether the title is on the list.
    #[serde(rename = "inWatchlist", default)]
    pub in_watchlist: bool,
}

// --- Errors ---

/// Error body returned by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AccountErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Non-2xx response from the account backend.
///
/// Carried inside `anyhow::Error`; callers recover it with `downcast_ref`
/// to show the server's own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountApiError {
    /// HTTP status code.
    pub status: u16,
    /// Server message, if the body carried one.
    pub message: Option<String>,
}

impl fmt::Display for AccountApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "account API error (HTTP {}): {message}", self.status),
            None => write!(f, "account API error (HTTP {})", self.status),
        }
    }
}

impl std::error::Error for AccountApiError {}
