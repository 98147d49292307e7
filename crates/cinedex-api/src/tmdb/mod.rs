//! TMDB API client module.
//!
//! Handles bearer-authenticated requests to TMDB v3 for trending lists,
//! search, details, credits, videos and similar titles.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use types::{
    IMAGE_BASE_URL, MoviePage, SearchMovieParams, SearchTvParams, TmdbCastMember, TmdbCreator,
    TmdbCredits, TmdbCrewMember, TmdbErrorResponse, TmdbGenre, TmdbMovie, TmdbMovieDetails,
    TmdbPage, TmdbTvDetails, TmdbTvShow, TmdbVideo, TmdbVideos, TrendingWindow, TvPage, image_url,
};
