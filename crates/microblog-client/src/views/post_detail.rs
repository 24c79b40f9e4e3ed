use microblog_common::models::Post;

use super::composer::Composer;
use crate::navigation::Route;
use crate::services::{PostThread, PostsService};
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Failed to load post. Please try again.";

/// A post, its direct replies, and a reply form for signed-in users.
pub struct PostDetailView {
    posts: PostsService,
    post_id: i64,
    thread: Option<PostThread>,
    loading: bool,
    error: Option<String>,
    composer: Composer,
}

impl PostDetailView {
    pub fn new(posts: PostsService, post_id: i64) -> Self {
        Self {
            posts,
            post_id,
            thread: None,
            loading: false,
            error: None,
            composer: Composer::reply_to(post_id),
        }
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;
        match self.posts.get(self.post_id).await {
            Ok(thread) => self.thread = Some(thread),
            Err(e) => {
                tracing::warn!(post_id = self.post_id, "post load failed: {e}");
                self.error = Some(e.user_message(LOAD_FAILED));
            }
        }
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The post, unless it was never loaded or has been redacted.
    pub fn post(&self) -> Option<&Post> {
        self.thread.as_ref().map(|t| &t.post).filter(|p| !p.redacted)
    }

    /// Replies fit for display, in server order.
    pub fn replies(&self) -> impl Iterator<Item = &Post> {
        self.thread
            .iter()
            .flat_map(|t| t.replies.iter())
            .filter(|p| !p.redacted)
    }

    /// Link back to the parent when this post is itself a reply.
    pub fn parent_route(&self) -> Option<Route> {
        self.post()?.parent_id.map(Route::Post)
    }

    pub fn can_reply(&self, session: &SessionStore) -> bool {
        session.is_authenticated() && self.post().is_some()
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// Submit the reply form and reload the thread so the new reply shows.
    pub async fn reply(&mut self, session: &SessionStore) -> Option<Post> {
        if !self.can_reply(session) {
            return None;
        }
        let created = self.composer.submit(&self.posts).await?;
        self.load().await;
        Some(created)
    }
}
