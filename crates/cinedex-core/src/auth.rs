//! Login, registration and logout.

use anyhow::{Context, Result};
use cinedex_api::account::{AccountApi, AccountApiError, Credentials, Registration};
use tracing::instrument;

use crate::error::BrowseError;
use crate::session::{Session, SessionStore};

/// Shown when a required field is blank.
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const SIGN_UP_FAILED: &str = "Sign up failed. Please try again.";
const SIGNED_UP: &str = "Account created. You can now log in.";

/// Rejects the request if any field is blank.
fn require_filled(fields: &[&str]) -> Result<()> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(BrowseError::validation(FILL_ALL_FIELDS).into());
    }
    Ok(())
}

/// Maps a backend failure to the server's message, or `fallback`.
fn rejection(err: &anyhow::Error, fallback: &str) -> BrowseError {
    let message = err
        .downcast_ref::<AccountApiError>()
        .and_then(|api_error| api_error.message.clone())
        .unwrap_or_else(|| String::from(fallback));
    BrowseError::Network { message }
}

/// Logs in and persists the resulting session.
///
/// # Errors
///
/// - [`BrowseError::Validation`] if a field is blank (no request is made).
/// - [`BrowseError::Network`] carrying the backend's message if it rejects
///   the credentials or cannot be reached.
/// - An I/O error if the session cannot be saved.
#[instrument(skip_all)]
pub async fn login<A: AccountApi>(
    api: &A,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<Session> {
    require_filled(&[email, password])?;

    let credentials = Credentials {
        email: email.trim().to_owned(),
        password: password.to_owned(),
    };
    let response = match api.login(&credentials).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %format_args!("{err:#}"), "login rejected");
            return Err(rejection(&err, LOGIN_FAILED).into());
        }
    };

    let session = Session {
        token: response.token,
        user: response.user,
    };
    if !session.logged_in() {
        tracing::warn!("login response carried no user");
        return Err(BrowseError::Network {
            message: String::from(LOGIN_FAILED),
        }
        .into());
    }

    store.save(&session).context("failed to persist session")?;
    tracing::info!(user_id = session.user_id().unwrap_or_default(), "logged in");
    Ok(session)
}

/// Registers a new account. Does not log in.
///
/// Returns the backend's confirmation message.
///
/// # Errors
///
/// - [`BrowseError::Validation`] if a field is blank (no request is made).
/// - [`BrowseError::Network`] carrying the backend's message if it rejects
///   the registration or cannot be reached.
#[instrument(skip_all)]
pub async fn register<A: AccountApi>(
    api: &A,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String> {
    require_filled(&[name, email, password])?;

    let registration = Registration {
        name: name.trim().to_owned(),
        email: email.trim().to_owned(),
        password: password.to_owned(),
    };
    match api.register(&registration).await {
        Ok(response) => Ok(response.message.unwrap_or_else(|| String::from(SIGNED_UP))),
        Err(err) => {
            tracing::warn!(error = %format_args!("{err:#}"), "registration rejected");
            Err(rejection(&err, SIGN_UP_FAILED).into())
        }
    }
}

/// Forgets the persisted session.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub fn logout(store: &SessionStore) -> Result<Session> {
    store.clear()?;
    tracing::info!("logged out");
    Ok(Session::logged_out())
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::bail;
    use cinedex_api::account::{
        AccountUser, AuthResponse, NewWatchlistEntry, WatchlistEntry, WatchlistKey,
    };

    use super::*;

    /// Scripted account backend.
    #[derive(Debug, Default)]
    pub(crate) struct MockAccount {
        pub(crate) reject_with: Option<AccountApiError>,
        pub(crate) calls: AtomicU32,
        pub(crate) entries: Vec<WatchlistEntry>,
        pub(crate) removed: Mutex<Vec<String>>,
        pub(crate) added: Mutex<Vec<String>>,
    }

    impl MockAccount {
        fn check(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ref error) = self.reject_with {
                return Err(anyhow::Error::new(error.clone()));
            }
            Ok(())
        }
    }

    impl AccountApi for MockAccount {
        async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
            self.check()?;
            Ok(AuthResponse {
                token: Some(String::from("jwt-token-abc")),
                user: Some(AccountUser {
                    id: String::from("7"),
                    name: String::from("Ada"),
                    email: Some(credentials.email.clone()),
                }),
                message: None,
            })
        }

        async fn register(&self, _registration: &Registration) -> Result<AuthResponse> {
            self.check()?;
            Ok(AuthResponse {
                message: Some(String::from("User registered successfully")),
                ..AuthResponse::default()
            })
        }

        async fn watchlist(&self, user_id: &str) -> Result<Vec<WatchlistEntry>> {
            self.check()?;
            if user_id != "7" {
                bail!("unknown user {user_id}");
            }
            Ok(self.entries.clone())
        }

        async fn add_to_watchlist(&self, entry: &NewWatchlistEntry) -> Result<()> {
            self.check()?;
            self.added
                .lock()
                .unwrap()
                .push(format!("{}:{}:{}", entry.media_type, entry.tmdb_id, entry.title));
            Ok(())
        }

        async fn check_watchlist(&self, key: &WatchlistKey) -> Result<bool> {
            self.check()?;
            Ok(self
                .entries
                .iter()
                .any(|entry| entry.tmdb_id == key.tmdb_id && entry.media_type == key.media_type))
        }

        async fn remove_from_watchlist(&self, key: &WatchlistKey) -> Result<()> {
            self.check()?;
            self.removed
                .lock()
                .unwrap()
                .push(format!("{}:{}", key.media_type, key.tmdb_id));
            Ok(())
        }
    }

    fn user_message(err: &anyhow::Error) -> String {
        err.downcast_ref::<BrowseError>()
            .unwrap()
            .user_message()
            .to_owned()
    }

    #[tokio::test]
    async fn test_login_blank_field_makes_no_request() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session.toml"));
        let api = MockAccount::default();

        // Act
        let err = login(&api, &store, "ada@example.com", "").await.unwrap_err();

        // Assert
        assert_eq!(user_message(&err), FILL_ALL_FIELDS);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session.toml"));
        let api = MockAccount::default();

        // Act
        let session = login(&api, &store, " ada@example.com ", "hunter2")
            .await
            .unwrap();

        // Assert
        assert_eq!(session.user_name(), Some("Ada"));
        assert_eq!(session.user_id(), Some("7"));
        assert_eq!(store.load().unwrap(), session);
        assert_eq!(
            session.user.unwrap().email.as_deref(),
            Some("ada@example.com")
        );
    }

    #[tokio::test]
    async fn test_login_rejection_uses_server_message() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session.toml"));
        let api = MockAccount {
            reject_with: Some(AccountApiError {
                status: 401,
                message: Some(String::from("Invalid credentials")),
            }),
            ..MockAccount::default()
        };

        // Act
        let err = login(&api, &store, "ada@example.com", "wrong")
            .await
            .unwrap_err();

        // Assert
        assert_eq!(user_message(&err), "Invalid credentials");
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_login_rejection_without_message_uses_fallback() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session.toml"));
        let api = MockAccount {
            reject_with: Some(AccountApiError {
                status: 500,
                message: None,
            }),
            ..MockAccount::default()
        };

        // Act
        let err = login(&api, &store, "ada@example.com", "pw")
            .await
            .unwrap_err();

        // Assert
        assert_eq!(user_message(&err), LOGIN_FAILED);
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        // Arrange
        let api = MockAccount::default();

        // Act
        let err = register(&api, "  ", "ada@example.com", "pw")
            .await
            .unwrap_err();

        // Assert
        assert_eq!(user_message(&err), FILL_ALL_FIELDS);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_register_returns_server_message() {
        // Arrange
        let api = MockAccount::default();

        // Act
        let message = register(&api, "Ada", "ada@example.com", "pw")
            .await
            .unwrap();

        // Assert
        assert_eq!(message, "User registered successfully");
    }

    #[test]
    fn test_logout_clears_store() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session.toml"));
        store
            .save(&Session {
                token: Some(String::from("t")),
                user: None,
            })
            .unwrap();

        // Act
        let session = logout(&store).unwrap();

        // Assert
        assert!(!session.logged_in());
        assert!(!store.path().exists());
    }
}
