use microblog_common::models::FeedFilter;

use super::paged::PagedList;
use crate::services::PostsService;

const LOAD_FAILED: &str = "Failed to load posts. Please try again.";

/// Home feed: a filter selector over a paged list.
pub struct FeedView {
    posts: PostsService,
    filter: FeedFilter,
    list: PagedList,
}

impl FeedView {
    pub fn new(posts: PostsService) -> Self {
        Self { posts, filter: FeedFilter::default(), list: PagedList::new() }
    }

    pub fn filter(&self) -> FeedFilter {
        self.filter
    }

    pub fn list(&self) -> &PagedList {
        &self.list
    }

    /// Switch filters. Picking the active filter again is a no-op.
    pub async fn set_filter(&mut self, filter: FeedFilter) {
        if filter == self.filter && self.list.is_loaded() {
            return;
        }
        self.filter = filter;
        self.refresh().await;
    }

    /// Reload the first page for the current filter.
    pub async fn refresh(&mut self) {
        let Some(ticket) = self.list.begin_reset() else {
            return;
        };
        let result = self
            .posts
            .list(self.filter, None)
            .await
            .map(|page| (page.posts, page.pagination));
        self.list.settle(&ticket, result, LOAD_FAILED);
    }

    /// Fetch the next page. Returns `false` when there was nothing to fetch.
    pub async fn load_more(&mut self) -> bool {
        let Some(ticket) = self.list.begin_load_more() else {
            return false;
        };
        let result = self
            .posts
            .list(self.filter, ticket.cursor.as_ref())
            .await
            .map(|page| (page.posts, page.pagination));
        self.list.settle(&ticket, result, LOAD_FAILED);
        true
    }

    /// A post was just created; show it by reloading from the top.
    pub async fn post_created(&mut self) {
        self.refresh().await;
    }

    pub fn close(&mut self) {
        self.list.close();
    }
}
