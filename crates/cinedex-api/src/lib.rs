//! API client library for cinedex.
//!
//! Provides clients for the TMDB catalog API and the account/watchlist
//! backend.

/// Account backend client (auth and watchlist).
pub mod account;
/// Media type shared by both APIs.
pub mod media;
mod throttle;
/// TMDB API client.
pub mod tmdb;

pub use media::MediaType;
