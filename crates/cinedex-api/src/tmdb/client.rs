//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::types::{
    MoviePage, SearchMovieParams, SearchTvParams, TmdbCredits, TmdbErrorResponse,
    TmdbMovieDetails, TmdbTvDetails, TmdbVideos, TrendingWindow, TvPage,
};
use crate::media::MediaType;
use crate::throttle::Throttle;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Default minimum interval between requests.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Response language sent with every request.
    language: String,
    /// Request throttle.
    throttle: Arc<Mutex<Throttle>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: `en-US`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        if api_token.trim().is_empty() {
            bail!("api_token must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let language = self
            .language
            .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE));
        let throttle = Throttle::new(self.min_interval.unwrap_or(DEFAULT_MIN_INTERVAL));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language,
            throttle: Arc::new(Mutex::new(throttle)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the configured response language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Sends a GET request with Bearer auth, the language parameter, and throttling.
    ///
    /// Non-2xx responses (including 429) fail immediately; there is no retry.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.throttle.lock().await.acquire().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .query(&[("language", self.language.as_str())])
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed = raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

/// Builds the `page` query parameter.
fn page_query(page: u32) -> [(&'static str, String); 1] {
    [("page", page.to_string())]
}

/// Builds the `query` and `page` parameters of a search.
fn search_query(term: &str, page: u32) -> [(&'static str, String); 2] {
    [("query", term.to_owned()), ("page", page.to_string())]
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn trending_movies(&self, window: TrendingWindow, page: u32) -> Result<MoviePage> {
        let path = format!("trending/movie/{}", window.as_str());
        self.get_json(&path, &page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn trending_tv(&self, window: TrendingWindow, page: u32) -> Result<TvPage> {
        let path = format!("trending/tv/{}", window.as_str());
        self.get_json(&path, &page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<MoviePage> {
        self.get_json("search/movie", &search_query(&params.query, params.page))
            .await
    }

    #[instrument(skip_all)]
    async fn search_tv(&self, params: &SearchTvParams) -> Result<TvPage> {
        self.get_json("search/tv", &search_query(&params.query, params.page))
            .await
    }

    #[instrument(skip_all)]
    async fn top_rated_movies(&self, page: u32) -> Result<MoviePage> {
        self.get_json("movie/top_rated", &page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn upcoming_movies(&self, page: u32) -> Result<MoviePage> {
        self.get_json("movie/upcoming", &page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails> {
        let path = format!("movie/{movie_id}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn tv_details(&self, series_id: u64) -> Result<TmdbTvDetails> {
        let path = format!("tv/{series_id}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn credits(&self, media: MediaType, id: u64) -> Result<TmdbCredits> {
        let path = format!("{media}/{id}/credits");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn videos(&self, media: MediaType, id: u64) -> Result<TmdbVideos> {
        let path = format!("{media}/{id}/videos");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn similar_movies(&self, movie_id: u64) -> Result<MoviePage> {
        let path = format!("movie/{movie_id}/similar");
        self.get_json(&path, &page_query(1)).await
    }

    #[instrument(skip_all)]
    async fn similar_tv(&self, series_id: u64) -> Result<TvPage> {
        let path = format!("tv/{series_id}/similar");
        self.get_json(&path, &page_query(1)).await
    }
}
