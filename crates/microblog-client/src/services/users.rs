//! Profile, settings and follow calls.

use serde::Deserialize;
use serde_json::json;

use microblog_common::models::{Cursor, Pagination, Post, User, UserUpdate};
use microblog_common::validation::validate_request;

use super::MessageResponse;
use crate::error::Result;
use crate::http::ApiClient;

/// A user with a page of their posts.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub user: User,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub pagination: Pagination,
    /// Whether the caller follows this user. Older servers omit it.
    #[serde(default)]
    pub following: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowResponse {
    #[serde(default)]
    pub message: String,
    pub following: bool,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Clone)]
pub struct UsersService {
    api: ApiClient,
}

impl UsersService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /users/:id`; `cursor` requests a later page of the user's posts.
    pub async fn get(&self, id: i64, cursor: Option<&Cursor>) -> Result<UserProfile> {
        let path = format!("/users/{id}");
        match cursor {
            Some(c) => self.api.get_with_query(&path, &[("cursor", c.as_str())]).await,
            None => self.api.get(&path).await,
        }
    }

    /// Update description and/or password. Validated locally before dispatch.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<User> {
        validate_request(update)?;
        let resp: UserEnvelope = self
            .api
            .patch(&format!("/users/{id}"), &json!({ "user": update }))
            .await?;
        Ok(resp.user)
    }

    /// Delete the account. Returns the server's acknowledgement message.
    pub async fn delete(&self, id: i64) -> Result<String> {
        let resp: Option<MessageResponse> = self.api.delete(&format!("/users/{id}")).await?;
        Ok(resp.unwrap_or_default().message)
    }

    pub async fn follow(&self, id: i64) -> Result<FollowResponse> {
        self.api.post_empty(&format!("/users/{id}/follow")).await
    }

    pub async fn unfollow(&self, id: i64) -> Result<FollowResponse> {
        self.api.delete(&format!("/users/{id}/follow")).await
    }
}
