//! Feed, post detail and post creation calls.

use serde::Deserialize;
use serde_json::json;

use microblog_common::models::{Cursor, FeedFilter, Pagination, Post};
use microblog_common::validation::validate_post_content;

use crate::error::Result;
use crate::http::ApiClient;

/// One page of a feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// A post with its direct replies.
#[derive(Debug, Clone, Deserialize)]
pub struct PostThread {
    pub post: Post,
    #[serde(default)]
    pub replies: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct PostEnvelope {
    post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepliesResponse {
    Wrapped { replies: Vec<Post> },
    Bare(Vec<Post>),
}

#[derive(Clone)]
pub struct PostsService {
    api: ApiClient,
}

impl PostsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /posts?filter=..[&cursor=..]`
    pub async fn list(&self, filter: FeedFilter, cursor: Option<&Cursor>) -> Result<FeedPage> {
        let mut query = vec![("filter", filter.as_str())];
        if let Some(c) = cursor {
            query.push(("cursor", c.as_str()));
        }
        self.api.get_with_query("/posts", &query).await
    }

    pub async fn get(&self, id: i64) -> Result<PostThread> {
        self.api.get(&format!("/posts/{id}")).await
    }

    /// Create a post or, with `parent_id`, a reply.
    ///
    /// Content is trimmed and checked locally first; invalid content never reaches the network.
    pub async fn create(&self, content: &str, parent_id: Option<i64>) -> Result<Post> {
        let content = validate_post_content(content)?;
        let resp: PostEnvelope = self
            .api
            .post("/posts", &json!({ "content": content, "parent_id": parent_id }))
            .await?;
        Ok(resp.post)
    }

    pub async fn replies(&self, id: i64) -> Result<Vec<Post>> {
        let resp: RepliesResponse = self.api.get(&format!("/posts/{id}/replies")).await?;
        Ok(match resp {
            RepliesResponse::Wrapped { replies } | RepliesResponse::Bare(replies) => replies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{MockApi, post_json};
    use axum::Json;
    use axum::Router;
    use axum::routing::get;
    use serde_json::Value;

    fn posts_routes() -> Router {
        Router::new()
            .route(
                "/posts",
                get(|| async {
                    Json(json!({
                        "posts": [post_json(1, "first", 1), post_json(2, "second", 2)],
                        "pagination": { "cursor": "c2", "has_next": true }
                    }))
                })
                .post(|Json(body): Json<Value>| async move {
                    let mut post = post_json(3, body["content"].as_str().unwrap_or_default(), 1);
                    post["parent_id"] = body["parent_id"].clone();
                    Json(json!({ "post": post }))
                }),
            )
            .route(
                "/posts/{id}",
                get(|| async { Json(json!({ "post": post_json(1, "first", 1) })) }),
            )
            .route(
                "/posts/{id}/replies",
                get(|| async { Json(json!({ "replies": [post_json(5, "re", 2)] })) }),
            )
    }

    #[tokio::test]
    async fn list_sends_filter_and_cursor() {
        let api = MockApi::serve(posts_routes()).await;
        let posts = PostsService::new(api.client(None).client);

        let page = posts.list(FeedFilter::default(), None).await.unwrap();
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.pagination.cursor, Some(Cursor::new("c2")));
        assert!(page.pagination.has_next);

        posts.list(FeedFilter::Following, page.pagination.cursor.as_ref()).await.unwrap();
        let reqs = api.requests();
        assert_eq!(reqs[0].query.as_deref(), Some("filter=timeline"));
        assert_eq!(reqs[1].query.as_deref(), Some("filter=following&cursor=c2"));
    }

    #[tokio::test]
    async fn get_defaults_missing_replies() {
        let api = MockApi::serve(posts_routes()).await;
        let thread = PostsService::new(api.client(None).client).get(1).await.unwrap();
        assert_eq!(thread.post.id, 1);
        assert!(thread.replies.is_empty());
    }

    #[tokio::test]
    async fn create_trims_and_sends_parent() {
        let api = MockApi::serve(posts_routes()).await;
        let posts = PostsService::new(api.client(Some("tok")).client);

        let reply = posts.create("  hello  ", Some(1)).await.unwrap();
        assert_eq!(reply.content, "hello");
        assert_eq!(reply.parent_id, Some(1));
        assert_eq!(api.requests()[0].body, json!({ "content": "hello", "parent_id": 1 }));

        let top = posts.create(&"a".repeat(200), None).await.unwrap();
        assert!(!top.is_reply());
        assert_eq!(api.requests()[1].body["parent_id"], Value::Null);
    }

    #[tokio::test]
    async fn invalid_content_never_dispatches() {
        let api = MockApi::serve(posts_routes()).await;
        let posts = PostsService::new(api.client(Some("tok")).client);

        let err = posts.create(&"a".repeat(201), None).await.unwrap_err();
        assert_eq!(err.user_message("x"), "Post cannot exceed 200 characters");
        let err = posts.create("   ", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn replies_accepts_wrapped_list() {
        let api = MockApi::serve(posts_routes()).await;
        let replies = PostsService::new(api.client(None).client).replies(1).await.unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(api.requests()[0].path, "/posts/1/replies");
    }
}
