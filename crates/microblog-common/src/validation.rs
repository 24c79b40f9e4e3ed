//! Input validation utilities.
//!
//! The server is the source of truth for every rule here; the client repeats the checks so
//! obviously invalid input never costs a round trip.

use validator::Validate;

use crate::error::ValidationError;

/// Maximum post length, in characters.
pub const MAX_POST_LENGTH: usize = 200;

/// Maximum profile description length, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 120;

/// Validate a form, returning a [`ValidationError::Invalid`] on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), ValidationError> {
    body.validate()
        .map_err(|e| ValidationError::invalid(format_validation_errors(e)))
}

/// Format validation errors into a human-readable string, ordered by field name.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"));
                (field.to_string(), msg)
            })
        })
        .collect();
    messages.sort();
    messages
        .into_iter()
        .map(|(_, msg)| msg)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check post content and return it trimmed.
///
/// Accepted iff the trimmed content has 1..=200 characters.
pub fn validate_post_content(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if trimmed.chars().count() > MAX_POST_LENGTH {
        return Err(ValidationError::ContentTooLong { max: MAX_POST_LENGTH });
    }
    Ok(trimmed.to_owned())
}

/// Characters left before the post limit. Negative once over.
pub fn remaining_chars(content: &str) -> i64 {
    MAX_POST_LENGTH as i64 - content.chars().count() as i64
}
