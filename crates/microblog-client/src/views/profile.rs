use microblog_common::models::User;

use super::paged::PagedList;
use crate::services::UsersService;
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Failed to load user. Please try again.";
const FOLLOW_FAILED: &str = "Failed to update follow status. Please try again.";

/// A user's page: who they are, their posts, and a follow toggle.
pub struct ProfileView {
    users: UsersService,
    user_id: i64,
    user: Option<User>,
    list: PagedList,
    following: bool,
    follow_error: Option<String>,
}

impl ProfileView {
    pub fn new(users: UsersService, user_id: i64) -> Self {
        Self {
            users,
            user_id,
            user: None,
            list: PagedList::new(),
            following: false,
            follow_error: None,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn list(&self) -> &PagedList {
        &self.list
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn follow_error(&self) -> Option<&str> {
        self.follow_error.as_deref()
    }

    /// Load the user and their first page of posts.
    pub async fn load(&mut self) {
        let Some(ticket) = self.list.begin_reset() else {
            return;
        };
        match self.users.get(self.user_id, None).await {
            Ok(profile) => {
                if self.list.complete(&ticket, profile.posts, profile.pagination) {
                    self.following = profile.following.unwrap_or(self.following);
                    self.user = Some(profile.user);
                }
            }
            Err(e) => {
                tracing::warn!(user_id = self.user_id, "profile load failed: {e}");
                self.list.fail(&ticket, e.user_message(LOAD_FAILED));
            }
        }
    }

    /// Fetch the next page of this user's posts.
    pub async fn load_more(&mut self) -> bool {
        let Some(ticket) = self.list.begin_load_more() else {
            return false;
        };
        let result = self
            .users
            .get(self.user_id, ticket.cursor.as_ref())
            .await
            .map(|profile| (profile.posts, profile.pagination));
        self.list.settle(&ticket, result, LOAD_FAILED);
        true
    }

    /// Viewing your own page hides the follow button.
    pub fn is_own_profile(&self, session: &SessionStore) -> bool {
        session.current_user().is_some_and(|u| u.id == self.user_id)
    }

    /// Follow button shows only for signed-in users on someone else's page.
    pub fn can_follow(&self, session: &SessionStore) -> bool {
        session.is_authenticated() && !self.is_own_profile(session)
    }

    /// Follow or unfollow based on the current state; the server's answer wins.
    ///
    /// Returns `false` if the toggle was not offered or the call failed.
    pub async fn toggle_follow(&mut self, session: &SessionStore) -> bool {
        if !self.can_follow(session) {
            return false;
        }
        self.follow_error = None;
        let result = if self.following {
            self.users.unfollow(self.user_id).await
        } else {
            self.users.follow(self.user_id).await
        };
        match result {
            Ok(resp) => {
                self.following = resp.following;
                true
            }
            Err(e) => {
                tracing::warn!(user_id = self.user_id, "follow toggle failed: {e}");
                self.follow_error = Some(e.user_message(FOLLOW_FAILED));
                false
            }
        }
    }

    /// "1 post" / "N posts" over what is currently shown.
    pub fn post_count_label(&self) -> String {
        match self.list.visible_count() {
            1 => "1 post".to_owned(),
            n => format!("{n} posts"),
        }
    }

    pub fn close(&mut self) {
        self.list.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AuthService;
    use crate::testing::{Harness, MockApi, post_json, user_json};
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn profile_routes() -> Router {
        Router::new()
            .route(
                "/users/{id}",
                get(|Path(id): Path<i64>, Query(q): Query<HashMap<String, String>>| async move {
                    if id == 404 {
                        return (StatusCode::NOT_FOUND, Json(json!({ "error": "User not found" })))
                            .into_response();
                    }
                    let second = q.get("cursor").map(String::as_str) == Some("next");
                    let (posts, pagination) = if second {
                        (vec![post_json(3, "third", id)], json!({ "cursor": null, "has_next": false }))
                    } else {
                        (
                            vec![post_json(1, "first", id), post_json(2, "second", id)],
                            json!({ "cursor": "next", "has_next": true }),
                        )
                    };
                    Json(json!({
                        "user": user_json(id, &format!("testuser{id}")),
                        "posts": posts,
                        "pagination": pagination
                    }))
                    .into_response()
                }),
            )
            .route(
                "/users/{id}/follow",
                post(|| async { Json(json!({ "message": "Followed", "following": true })) })
                    .delete(|| async { Json(json!({ "message": "Unfollowed", "following": false })) }),
            )
    }

    fn signed_in(h: &Harness, user_id: i64) -> SessionStore {
        let session = SessionStore::new(AuthService::new(h.client.clone()));
        session.set_user(User { id: user_id, username: format!("testuser{user_id}"), description: None });
        session
    }

    #[tokio::test]
    async fn loads_user_and_pages_with_cursor() {
        let api = MockApi::serve(profile_routes()).await;
        let mut view = ProfileView::new(UsersService::new(api.client(None).client), 2);

        view.load().await;
        assert_eq!(view.user().unwrap().handle(), "@testuser2");
        assert_eq!(view.post_count_label(), "2 posts");

        assert!(view.load_more().await);
        let ids: Vec<_> = view.list().visible().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!view.list().offers_load_more());
        assert_eq!(api.requests().last().unwrap().query.as_deref(), Some("cursor=next"));
    }

    #[tokio::test]
    async fn missing_user_shows_server_message() {
        let api = MockApi::serve(profile_routes()).await;
        let mut view = ProfileView::new(UsersService::new(api.client(None).client), 404);

        view.load().await;
        assert!(view.user().is_none());
        assert_eq!(view.list().error(), Some("User not found"));
    }

    #[tokio::test]
    async fn own_profile_has_no_follow_toggle() {
        let api = MockApi::serve(profile_routes()).await;
        let h = api.client(Some("t"));
        let session = signed_in(&h, 2);
        let mut view = ProfileView::new(UsersService::new(h.client.clone()), 2);

        assert!(view.is_own_profile(&session));
        assert!(!view.toggle_follow(&session).await);
        assert_eq!(api.count("POST", "/users/2/follow"), 0);
    }

    #[tokio::test]
    async fn guests_cannot_follow() {
        let api = MockApi::serve(profile_routes()).await;
        let h = api.client(None);
        let session = SessionStore::new(AuthService::new(h.client.clone()));
        let view = ProfileView::new(UsersService::new(h.client.clone()), 2);
        assert!(!view.can_follow(&session));
    }

    #[tokio::test]
    async fn toggle_follows_then_unfollows() {
        let api = MockApi::serve(profile_routes()).await;
        let h = api.client(Some("t"));
        let session = signed_in(&h, 1);
        let mut view = ProfileView::new(UsersService::new(h.client.clone()), 2);

        assert!(view.toggle_follow(&session).await);
        assert!(view.is_following());
        assert!(view.toggle_follow(&session).await);
        assert!(!view.is_following());
        assert_eq!(api.count("POST", "/users/2/follow"), 1);
        assert_eq!(api.count("DELETE", "/users/2/follow"), 1);
    }

    #[tokio::test]
    async fn single_post_label() {
        let api = MockApi::serve(Router::new().route(
            "/users/{id}",
            get(|| async {
                Json(json!({ "user": user_json(7, "solo"), "posts": [post_json(1, "only", 7)] }))
            }),
        ))
        .await;
        let mut view = ProfileView::new(UsersService::new(api.client(None).client), 7);
        view.load().await;
        assert_eq!(view.post_count_label(), "1 post");
    }
}
