//! Post model and the feed pagination primitives.
//!
//! Posts are at most 200 characters. A post with a `parent_id` is a reply; threads are
//! stored arbitrarily deep but displayed one level at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::user::User;

/// A post or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,

    pub content: String,

    pub author: User,

    pub created_at: DateTime<Utc>,

    /// Post this one replies to
    #[serde(default)]
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub replies_count: u32,

    /// Hidden by moderation. Never rendered, even if the server sends it.
    #[serde(default)]
    pub redacted: bool,
}

impl Post {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Opaque server-issued resume point. Never parsed or compared for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<Cursor>,
    #[serde(default)]
    pub has_next: bool,
}

/// Which posts a feed shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFilter {
    /// Global public feed
    #[default]
    Timeline,
    /// Posts authored by the current user
    Mine,
    /// Posts by followed users
    Following,
}

impl FeedFilter {
    pub const ALL: [FeedFilter; 3] = [FeedFilter::Timeline, FeedFilter::Mine, FeedFilter::Following];

    /// Value of the `filter` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeline => "timeline",
            Self::Mine => "mine",
            Self::Following => "following",
        }
    }

    /// Tab label in the feed header.
    pub fn label(self) -> &'static str {
        match self {
            Self::Timeline => "Timeline",
            Self::Mine => "My Posts",
            Self::Following => "Following",
        }
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown feed filter '{s}' (expected timeline, mine or following)"))
    }
}
