//! TMDB API response types and request parameters.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// Base URL for TMDB images (`{base}{size}{path}`).
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Builds a full image URL from a TMDB image path (e.g. `"/abc.jpg"`).
#[must_use]
pub fn image_url(size: &str, path: &str) -> String {
    format!("{IMAGE_BASE_URL}{size}{path}")
}

/// Extracts the year from a `YYYY-MM-DD` date. TMDB sends `""` for unknown dates.
fn year_of(date: Option<&str>) -> Option<i32> {
    let date = date?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

const fn first_page() -> u32 {
    1
}

// --- Paged lists ---

/// A paged list response (`search/*`, `trending/*`, `movie/top_rated`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    /// Current page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages (absent on some endpoints).
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// Paged movie list.
pub type MoviePage = TmdbPage<TmdbMovie>;

/// Paged TV series list.
pub type TvPage = TmdbPage<TmdbTvShow>;

/// A movie list entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl TmdbMovie {
    /// Release year, if the release date is known.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        year_of(self.release_date.as_deref())
    }
}

/// A TV series list entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvShow {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// First air date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl TmdbTvShow {
    /// First air year, if known.
    #[must_use]
    pub fn first_air_year(&self) -> Option<i32> {
        year_of(self.first_air_date.as_deref())
    }
}

// --- Details ---

/// Genre entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Release status (e.g. "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl TmdbMovieDetails {
    /// Release year, if known.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        year_of(self.release_date.as_deref())
    }
}

/// Series creator.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCreator {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
}

/// Response from `tv/{series_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// First air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Last air date.
    #[serde(default)]
    pub last_air_date: Option<String>,
    /// Total number of seasons.
    #[serde(default)]
    pub number_of_seasons: u32,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Typical episode runtimes in minutes.
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    /// Status (e.g. "Returning Series", "Ended").
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the show is still in production.
    #[serde(default)]
    pub in_production: bool,
    /// Series creators.
    #[serde(default)]
    pub created_by: Vec<TmdbCreator>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl TmdbTvDetails {
    /// First air year, if known.
    #[must_use]
    pub fn first_air_year(&self) -> Option<i32> {
        year_of(self.first_air_date.as_deref())
    }
}

// --- Credits ---

/// Response from `{movie,tv}/{id}/credits`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    /// Cast, in billing order.
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

/// A cast credit.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

/// A crew credit.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g. "Director").
    #[serde(default)]
    pub job: String,
    /// Department (e.g. "Directing").
    #[serde(default)]
    pub department: String,
}

// --- Videos ---

/// Response from `{movie,tv}/{id}/videos`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideos {
    /// Videos attached to the title.
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

/// A video attached to a title.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbVideo {
    /// Site-specific key (the `YouTube` video ID for `site == "YouTube"`).
    pub key: String,
    /// Video name.
    #[serde(default)]
    pub name: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub video_type: String,
    /// Whether the video is official.
    #[serde(default)]
    pub official: bool,
}

impl TmdbVideo {
    /// Watch URL for `YouTube`-hosted videos.
    #[must_use]
    pub fn youtube_url(&self) -> Option<String> {
        (self.site == "YouTube").then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

// --- Parameters ---

/// Time window for `trending/*` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    /// Trending over the last day.
    #[default]
    Day,
    /// Trending over the last week.
    Week,
}

impl TrendingWindow {
    /// Path segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// Parameters for `search/movie`.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Parameters for `search/tv`.
#[derive(Debug, Clone)]
pub struct SearchTvParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
}

impl SearchTvParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}
