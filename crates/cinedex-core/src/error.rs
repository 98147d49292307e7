//! `BrowseError` - user-facing failure taxonomy.

/// A failure surfaced to the user.
///
/// None of these are fatal; each waits for the next user-driven action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseError {
    /// Transport, HTTP status or decode failure.
    Network {
        /// Message shown to the user.
        message: String,
    },
    /// The request succeeded but returned no items.
    EmptyResult {
        /// Message shown to the user.
        message: String,
    },
    /// Input rejected before any request was made.
    Validation {
        /// Message shown to the user.
        message: String,
    },
}

impl BrowseError {
    /// `Could not fetch {label}. Please try again later.`
    #[must_use]
    pub fn network(label: &str) -> Self {
        Self::Network {
            message: format!("Could not fetch {label}. Please try again later."),
        }
    }

    /// `No {label} found.`
    #[must_use]
    pub fn empty(label: &str) -> Self {
        Self::EmptyResult {
            message: format!("No {label} found."),
        }
    }

    /// Validation failure with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::EmptyResult { message }
            | Self::Validation { message } => message,
        }
    }
}

impl std::fmt::Display for BrowseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { message } => write!(f, "network error: {message}"),
            Self::EmptyResult { message } => write!(f, "empty result: {message}"),
            Self::Validation { message } => write!(f, "validation error: {message}"),
        }
    }
}

impl std::error::Error for BrowseError {}
