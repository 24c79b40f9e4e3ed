use microblog_common::models::Post;
use microblog_common::validation::{MAX_POST_LENGTH, remaining_chars, validate_post_content};

use crate::services::PostsService;

const CREATE_FAILED: &str = "Failed to create post. Please try again.";

/// Below this many remaining characters the counter turns to a warning.
pub const WARNING_THRESHOLD: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStyle {
    Normal,
    Warning,
}

/// Post and reply form.
#[derive(Debug, Default)]
pub struct Composer {
    parent_id: Option<i64>,
    content: String,
    submitting: bool,
    error: Option<String>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_to(parent_id: i64) -> Self {
        Self { parent_id: Some(parent_id), ..Self::default() }
    }

    pub fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Characters left before the limit; negative once over.
    pub fn remaining(&self) -> i64 {
        remaining_chars(&self.content)
    }

    pub fn counter_style(&self) -> CounterStyle {
        if self.remaining() < WARNING_THRESHOLD {
            CounterStyle::Warning
        } else {
            CounterStyle::Normal
        }
    }

    pub fn counter_label(&self) -> String {
        format!("{}/{MAX_POST_LENGTH}", self.content.chars().count())
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && validate_post_content(&self.content).is_ok()
    }

    pub fn heading(&self) -> &'static str {
        if self.parent_id.is_some() { "Reply to Post" } else { "Create New Post" }
    }

    pub fn placeholder(&self) -> &'static str {
        if self.parent_id.is_some() { "Write your reply..." } else { "What's on your mind?" }
    }

    pub fn button_label(&self) -> &'static str {
        match (self.submitting, self.parent_id) {
            (true, _) => "Posting...",
            (false, Some(_)) => "Reply",
            (false, None) => "Post",
        }
    }

    /// Validate and create. Invalid content sets the error without a request.
    ///
    /// On success the content is cleared and the created post returned.
    pub async fn submit(&mut self, posts: &PostsService) -> Option<Post> {
        self.error = None;
        if let Err(e) = validate_post_content(&self.content) {
            self.error = Some(e.to_string());
            return None;
        }

        self.submitting = true;
        let result = posts.create(&self.content, self.parent_id).await;
        self.submitting = false;

        match result {
            Ok(post) => {
                tracing::info!(post_id = post.id, parent_id = ?self.parent_id, "post created");
                self.content.clear();
                Some(post)
            }
            Err(e) => {
                tracing::warn!("post create failed: {e}");
                self.error = Some(e.user_message(CREATE_FAILED));
                None
            }
        }
    }
}
