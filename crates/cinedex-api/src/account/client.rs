//! `AccountClient` - account backend client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::AccountApi;
use super::types::{
    AccountApiError, AccountErrorBody, AuthResponse, Credentials, NewWatchlistEntry, Registration,
    WatchlistEntry, WatchlistKey, WatchlistResponse, WatchlistStatus,
};
use crate::throttle::Throttle;

/// Default base URL of the account backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";

/// Default minimum interval between requests.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Account backend client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AccountClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Session token, sent as `Authorization: Bearer` when present.
    bearer_token: Option<String>,
    /// Request throttle.
    throttle: Arc<Mutex<Throttle>>,
}

/// Builder for `AccountClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AccountClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    bearer_token: Option<String>,
    min_interval: Option<Duration>,
}

impl AccountClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            bearer_token: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (default: `http://localhost:5000/api/`).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the session token sent with every request.
    #[must_use]
    pub fn bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
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
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<AccountClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let throttle = Throttle::new(self.min_interval.unwrap_or(DEFAULT_MIN_INTERVAL));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .build()
            .context("failed to build HTTP client")?;

        Ok(AccountClient {
            http_client,
            base_url,
            bearer_token: self.bearer_token,
            throttle: Arc::new(Mutex::new(throttle)),
        })
    }
}

impl AccountClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> AccountClientBuilder {
        AccountClientBuilder::new()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request with an optional JSON body.
    ///
    /// Non-2xx responses become an [`AccountApiError`] carrying the body's
    /// `message` field.
    #[instrument(skip_all)]
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        self.throttle.lock().await.acquire().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut builder = self.http_client.request(method, url);
        if let Some(ref token) = self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let request = builder
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(method = %request.method(), url = %request.url(), "account API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AccountErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.trim().is_empty());
            return Err(anyhow::Error::new(AccountApiError {
                status: status.as_u16(),
                message,
            }))
            .with_context(|| format!("account API request failed: {path}"));
        }

        Ok(response)
    }

    /// Sends a request and decodes the JSON response.
    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let response = self.send(method, path, body).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&text);
        let parsed = raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

impl AccountApi for AccountClient {
    #[instrument(skip_all)]
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.send_json(Method::POST, "auth/login", Some(credentials))
            .await
    }

    #[instrument(skip_all)]
    async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        self.send_json(Method::POST, "auth/register", Some(registration))
            .await
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    async fn watchlist(&self, user_id: &str) -> Result<Vec<WatchlistEntry>> {
        let path = format!("watchlist/{user_id}");
        let response: WatchlistResponse =
            self.send_json(Method::GET, &path, None::<&()>).await?;
        Ok(response.watchlist)
    }

    #[instrument(skip_all)]
    async fn add_to_watchlist(&self, entry: &NewWatchlistEntry) -> Result<()> {
        self.send(Method::POST, "watchlist/add", Some(entry)).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn check_watchlist(&self, key: &WatchlistKey) -> Result<bool> {
        let status: WatchlistStatus = self
            .send_json(Method::POST, "watchlist/check", Some(key))
            .await?;
        Ok(status.in_watchlist)
    }

    #[instrument(skip_all)]
    async fn remove_from_watchlist(&self, key: &WatchlistKey) -> Result<()> {
        self.send(Method::DELETE, "watchlist/remove", Some(key)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::media::MediaType;

    fn client_for(mock_server: &wiremock::MockServer, token: Option<&str>) -> AccountClient {
        let base_url = format!("{}/api/", mock_server.uri());
        AccountClient::builder()
            .base_url(base_url.parse().unwrap())
            .user_agent("test/0.0.0")
            .bearer_token(token.map(String::from))
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = AccountClient::builder().build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_default_base_url() {
        // Arrange & Act
        let client = AccountClient::builder()
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_login_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/account/login_ok.json");

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/api/auth/login"))
            .and(wiremock::matchers::body_json(serde_json::json!({
                "email": "ada@example.com",
                "password": "hunter2",
            })))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, None);
        let credentials = Credentials {
            email: String::from("ada@example.com"),
            password: String::from("hunter2"),
        };

        // Act
        let response = client.login(&credentials).await.unwrap();

        // Assert
        assert_eq!(response.token.as_deref(), Some("jwt-token-abc"));
        let user = response.user.unwrap();
        assert_eq!(user.id, "7");
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn test_login_rejected_carries_server_message() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/api/auth/login"))
            .respond_with(
                wiremock::ResponseTemplate::new(401)
                    .set_body_string(r#"{"message":"Invalid credentials"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, None);
        let credentials = Credentials {
            email: String::from("ada@example.com"),
            password: String::from("wrong"),
        };

        // Act
        let err = client.login(&credentials).await.unwrap_err();

        // Assert
        let api_error = err.downcast_ref::<AccountApiError>().unwrap();
        assert_eq!(api_error.status, 401);
        assert_eq!(api_error.message.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_error_without_json_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, None);
        let registration = Registration {
            name: String::from("Ada"),
            email: String::from("ada@example.com"),
            password: String::from("hunter2"),
        };

        // Act
        let err = client.register(&registration).await.unwrap_err();

        // Assert
        let api_error = err.downcast_ref::<AccountApiError>().unwrap();
        assert_eq!(api_error.status, 500);
        assert_eq!(api_error.message, None);
    }

    #[tokio::test]
    async fn test_watchlist_via_http_sends_bearer() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/account/watchlist.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/watchlist/7"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer jwt-token-abc",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Some("jwt-token-abc"));

        // Act
        let entries = client.watchlist("7").await.unwrap();

        // Assert
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tmdb_id, "155");
        assert_eq!(entries[0].media_type, MediaType::Movie);
        assert_eq!(entries[1].tmdb_id, "1396");
        assert_eq!(entries[1].media_type, MediaType::Tv);
    }

    #[tokio::test]
    async fn test_check_watchlist_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/api/watchlist/check"))
            .and(wiremock::matchers::body_json(serde_json::json!({
                "user_id": "7",
                "tmdb_id": "155",
                "media_type": "movie",
            })))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string(r#"{"inWatchlist":true}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, None);

        // Act
        let present = client
            .check_watchlist(&WatchlistKey::new("7", 155, MediaType::Movie))
            .await
            .unwrap();

        // Assert
        assert!(present);
    }

    #[tokio::test]
    async fn test_add_to_watchlist_ignores_response_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/api/watchlist/add"))
            .respond_with(wiremock::ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, None);
        let entry = NewWatchlistEntry {
            user_id: String::from("7"),
            tmdb_id: String::from("155"),
            media_type: MediaType::Movie,
            title: String::from("The Dark Knight"),
            poster_path: Some(String::from("/qJ2tW6WMUDux911r6m7haRef0WH.jpg")),
            backdrop_path: None,
            extra_details: serde_json::json!({}),
        };

        // Act & Assert
        client.add_to_watchlist(&entry).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_from_watchlist_uses_delete() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("DELETE"))
            .and(wiremock::matchers::path("/api/watchlist/remove"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string(r#"{"message":"Removed"}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, None);

        // Act & Assert
        client
            .remove_from_watchlist(&WatchlistKey::new("7", 1396, MediaType::Tv))
            .await
            .unwrap();
    }
}
