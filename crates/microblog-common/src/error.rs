//! Error types shared by the client crates.
//!
//! [`ValidationError`] covers input rejected locally before any request is sent.
//! [`ApiErrorBody`] is the error payload the API returns alongside non-2xx statuses.

use serde::Deserialize;

/// Input rejected on the client before dispatch. The `Display` text is user facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Post content cannot be empty")]
    EmptyContent,

    #[error("Post cannot exceed {max} characters")]
    ContentTooLong { max: usize },

    #[error("{message}")]
    Invalid { message: String },
}

impl ValidationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid { message: message.into() }
    }
}

/// JSON error body sent by the API.
///
/// The backend uses either `{"error": "..."}` or `{"errors": ["...", ...]}`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, returning `None` for anything that is not the expected JSON shape.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// The server's message, verbatim where available.
    pub fn message(&self) -> Option<String> {
        if let Some(e) = self.error.as_deref().filter(|e| !e.is_empty()) {
            return Some(e.to_owned());
        }
        if !self.errors.is_empty() {
            return Some(self.errors.join(", "));
        }
        self.message.clone().filter(|m| !m.is_empty())
    }
}
