//! High-level `MicroblogClient` bundling the services and the session.

use std::sync::Arc;

use crate::error::Result;
use crate::http::ApiClient;
use crate::navigation::Navigator;
use crate::services::{AuthService, PostsService, ReportsService, UsersService};
use crate::session::SessionStore;
use crate::storage::TokenStore;
use crate::views::{FeedView, PostDetailView, ProfileView, SettingsView};

/// Everything a front end needs, sharing one HTTP client and token store.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use microblog_client::{MemoryNavigator, MemoryTokenStore, MicroblogClient};
///
/// #[tokio::main]
/// async fn main() -> microblog_client::Result<()> {
///     let client = MicroblogClient::new(
///         "http://localhost:3000/api/v1",
///         Arc::new(MemoryTokenStore::new()),
///         Arc::new(MemoryNavigator::default()),
///     )?;
///     client.session.bootstrap().await;
///
///     let mut feed = client.feed();
///     feed.refresh().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MicroblogClient {
    pub api: ApiClient,
    pub posts: PostsService,
    pub users: UsersService,
    pub reports: ReportsService,
    pub session: SessionStore,
}

impl MicroblogClient {
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let api = ApiClient::new(base_url, tokens, navigator)?;
        Ok(Self {
            posts: PostsService::new(api.clone()),
            users: UsersService::new(api.clone()),
            reports: ReportsService::new(api.clone()),
            session: SessionStore::new(AuthService::new(api.clone())),
            api,
        })
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        self.api.navigator()
    }

    pub fn feed(&self) -> FeedView {
        FeedView::new(self.posts.clone())
    }

    pub fn post_detail(&self, post_id: i64) -> PostDetailView {
        PostDetailView::new(self.posts.clone(), post_id)
    }

    pub fn profile(&self, user_id: i64) -> ProfileView {
        ProfileView::new(self.users.clone(), user_id)
    }

    pub fn settings(&self) -> SettingsView {
        SettingsView::new(self.users.clone(), &self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{MemoryNavigator, Route};
    use crate::storage::MemoryTokenStore;
    use crate::testing::{MockApi, post_json, user_json};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn services_share_one_token_store() {
        let api = MockApi::serve(
            Router::new()
                .route(
                    "/login",
                    post(|| async { Json(json!({ "token": "jwt", "user": user_json(1, "testuser1") })) }),
                )
                .route(
                    "/posts",
                    get(|| async { Json(json!({ "posts": [post_json(1, "hi", 1)], "pagination": { "has_next": false } })) })
                        .post(|| async { (StatusCode::CREATED, Json(json!({ "post": post_json(2, "new", 1) }))) }),
                ),
        )
        .await;
        let tokens = Arc::new(MemoryTokenStore::new());
        let client = MicroblogClient::new(
            &api.base_url,
            tokens.clone(),
            Arc::new(MemoryNavigator::new(Route::Login)),
        )
        .unwrap();

        client.session.login("testuser1", "password123").await.unwrap();
        client.posts.create("new", None).await.unwrap();

        let mut feed = client.feed();
        feed.refresh().await;
        assert_eq!(feed.list().visible_count(), 1);

        let create = api.requests().into_iter().find(|r| r.method == "POST" && r.path == "/posts").unwrap();
        assert_eq!(create.authorization.as_deref(), Some("Bearer jwt"));
        assert_eq!(client.navigator().current(), Route::Login);
    }
}
