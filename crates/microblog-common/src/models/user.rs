//! User model and the account forms that mutate it.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A Microblog account as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub username: String,

    /// Short bio (up to 120 chars)
    #[serde(default)]
    pub description: Option<String>,
}

impl User {
    /// `@username`, as shown next to posts and on profiles.
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

/// Registration form. Sent as `{"user": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,

    #[validate(length(max = 120, message = "Description cannot exceed 120 characters"))]
    pub description: String,
}

impl SignupForm {
    /// Form whose confirmation mirrors the password, as the signup page submits it.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            password_confirmation: password.clone(),
            password,
            description: description.unwrap_or_default(),
        }
    }
}

/// Settings update. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
#[validate(schema(function = "passwords_match"))]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "Description cannot exceed 120 characters"))]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

/// A new password must come with an identical confirmation.
fn passwords_match(update: &UserUpdate) -> Result<(), ValidationError> {
    if update.password.is_some() && update.password != update.password_confirmation {
        return Err(ValidationError::new("password_mismatch").with_message("Passwords do not match".into()));
    }
    Ok(())
}
