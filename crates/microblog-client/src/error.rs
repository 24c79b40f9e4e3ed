//! Error types for the Microblog client.

use microblog_common::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected locally; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A 401 that the refresh path did not recover.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Token refresh failed; the stored token has been purged.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The HTTP response had a non-2xx status code.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// An error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

const NETWORK_MESSAGE: &str = "Network error. Please try again.";
const BAD_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

impl ClientError {
    /// The text a view shows for this error. `fallback` covers failures with nothing better to say.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Unauthorized { message } if !message.is_empty() => message.clone(),
            Self::Unauthorized { .. } => BAD_CREDENTIALS_MESSAGE.to_owned(),
            Self::SessionExpired => self.to_string(),
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Http(_) => NETWORK_MESSAGE.to_owned(),
            Self::Api { .. } | Self::Json(_) => fallback.to_owned(),
        }
    }

    /// Transport failures and 5xx responses are worth retrying; everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } | Self::SessionExpired => Some(401),
            _ => None,
        }
    }
}
