//! Cursor-paginated post list shared by the feed and profile views.
//!
//! State is `{cursor, has_next, items}` plus the ticket of the one request allowed in flight.
//! A reset replaces items wholesale; a load-more appends in server order. Responses whose
//! ticket is no longer current (superseded by a reset, or arriving after `close`) are dropped.

use microblog_common::models::{Cursor, Pagination, Post};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// First page: filter change, explicit refresh, or initial load.
    Reset,
    /// Next page after the current cursor.
    More,
}

/// Handle for one page request. Carries the cursor to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    id: u64,
    pub kind: LoadKind,
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Default)]
pub struct PagedList {
    items: Vec<Post>,
    cursor: Option<Cursor>,
    has_next: bool,
    next_id: u64,
    in_flight: Option<u64>,
    loaded: bool,
    closed: bool,
    error: Option<String>,
    retryable: bool,
}

impl PagedList {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, kind: LoadKind, cursor: Option<Cursor>) -> PageTicket {
        self.next_id += 1;
        self.in_flight = Some(self.next_id);
        self.error = None;
        self.retryable = false;
        PageTicket { id: self.next_id, kind, cursor }
    }

    /// Start over from the first page. Supersedes any request in flight.
    pub fn begin_reset(&mut self) -> Option<PageTicket> {
        if self.closed {
            return None;
        }
        self.cursor = None;
        Some(self.issue(LoadKind::Reset, None))
    }

    /// Request the next page, unless one is already in flight or there is nothing more.
    pub fn begin_load_more(&mut self) -> Option<PageTicket> {
        if self.closed || self.in_flight.is_some() || !self.has_next {
            return None;
        }
        let cursor = self.cursor.clone()?;
        Some(self.issue(LoadKind::More, Some(cursor)))
    }

    /// Apply a page. Returns `false` if the ticket is stale and the page was dropped.
    pub fn complete(&mut self, ticket: &PageTicket, posts: Vec<Post>, pagination: Pagination) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        match ticket.kind {
            LoadKind::Reset => self.items = posts,
            LoadKind::More => self.items.extend(posts),
        }
        self.cursor = pagination.cursor;
        self.has_next = pagination.has_next;
        self.loaded = true;
        true
    }

    /// Record a failed request. Items already shown are kept.
    pub fn fail(&mut self, ticket: &PageTicket, message: String) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.error = Some(message);
        true
    }

    /// [`complete`](Self::complete) or [`fail`](Self::fail), with `fallback` as the message
    /// for errors that carry none.
    pub fn settle(
        &mut self,
        ticket: &PageTicket,
        result: Result<(Vec<Post>, Pagination), ClientError>,
        fallback: &str,
    ) -> bool {
        match result {
            Ok((posts, pagination)) => self.complete(ticket, posts, pagination),
            Err(e) => {
                tracing::warn!("page load failed: {e}");
                let applied = self.fail(ticket, e.user_message(fallback));
                self.retryable = applied && e.is_retryable();
                applied
            }
        }
    }

    fn accept(&mut self, ticket: &PageTicket) -> bool {
        if self.closed || self.in_flight != Some(ticket.id) {
            tracing::debug!(ticket = ticket.id, "dropping stale page");
            return false;
        }
        self.in_flight = None;
        true
    }

    /// The owning view went away; later responses are ignored.
    pub fn close(&mut self) {
        self.closed = true;
        self.in_flight = None;
    }

    /// Everything received, including posts flagged redacted.
    pub fn items(&self) -> &[Post] {
        &self.items
    }

    /// Posts fit for display. Redacted posts are dropped even if the server sent them.
    pub fn visible(&self) -> impl Iterator<Item = &Post> {
        self.items.iter().filter(|p| !p.redacted)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Loaded, but nothing to show: the "No posts yet" state.
    pub fn is_empty_visible(&self) -> bool {
        self.loaded && self.visible().next().is_none()
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether at least one page has arrived.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last failure was transient (network or 5xx); trying again may work.
    pub fn can_retry(&self) -> bool {
        self.error.is_some() && self.retryable
    }

    /// Show the "Load More" control: more pages exist and nothing is in flight.
    pub fn offers_load_more(&self) -> bool {
        self.has_next && self.cursor.is_some() && !self.is_loading() && !self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use microblog_common::models::User;

    fn post(id: i64) -> Post {
        Post {
            id,
            content: format!("post {id}"),
            author: User { id: 1, username: "testuser1".into(), description: None },
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            parent_id: None,
            replies_count: 0,
            redacted: false,
        }
    }

    fn page(ids: std::ops::Range<i64>, cursor: Option<&str>, has_next: bool) -> (Vec<Post>, Pagination) {
        (
            ids.map(post).collect(),
            Pagination { cursor: cursor.map(Cursor::new), has_next },
        )
    }

    fn ids(list: &PagedList) -> Vec<i64> {
        list.visible().map(|p| p.id).collect()
    }

    #[test]
    fn load_more_accumulates_in_order() {
        let mut list = PagedList::new();
        let t = list.begin_reset().unwrap();
        let (posts, pg) = page(0..3, Some("c1"), true);
        assert!(list.complete(&t, posts, pg));

        for n in 1..=3i64 {
            let t = list.begin_load_more().unwrap();
            assert_eq!(t.cursor, Some(Cursor::new(format!("c{n}"))));
            let next = format!("c{}", n + 1);
            let (posts, pg) = page(n * 10..n * 10 + 2, Some(&next), true);
            list.complete(&t, posts, pg);
        }

        assert_eq!(ids(&list), vec![0, 1, 2, 10, 11, 20, 21, 30, 31]);
        assert!(list.offers_load_more());
    }

    #[test]
    fn last_page_hides_load_more() {
        let mut list = PagedList::new();
        let t = list.begin_reset().unwrap();
        let (posts, pg) = page(0..2, None, false);
        list.complete(&t, posts, pg);

        assert!(!list.offers_load_more());
        assert!(list.begin_load_more().is_none());
        assert!(!list.is_empty_visible());
    }

    #[test]
    fn all_redacted_page_reads_as_empty() {
        let mut list = PagedList::new();
        assert!(!list.is_empty_visible());
        let t = list.begin_reset().unwrap();
        let (mut posts, pg) = page(0..1, None, false);
        posts[0].redacted = true;
        list.complete(&t, posts, pg);
        assert!(list.is_empty_visible());
    }

    #[test]
    fn no_overlapping_load_more() {
        let mut list = PagedList::new();
        let t = list.begin_reset().unwrap();
        let (posts, pg) = page(0..2, Some("c1"), true);
        list.complete(&t, posts, pg);

        let first = list.begin_load_more().unwrap();
        assert!(!list.offers_load_more());
        assert!(list.begin_load_more().is_none());

        let (posts, pg) = page(2..4, Some("c2"), true);
        list.complete(&first, posts, pg);
        assert!(list.begin_load_more().is_some());
    }

    #[test]
    fn reset_replaces_and_supersedes() {
        let mut list = PagedList::new();
        let t = list.begin_reset().unwrap();
        let (posts, pg) = page(0..2, Some("c1"), true);
        list.complete(&t, posts, pg);

        let more = list.begin_load_more().unwrap();
        let reset = list.begin_reset().unwrap();
        assert_eq!(reset.cursor, None);

        let (posts, pg) = page(50..52, Some("x"), true);
        assert!(!list.complete(&more, posts, pg), "superseded page must be dropped");

        let (posts, pg) = page(100..101, None, false);
        assert!(list.complete(&reset, posts, pg));
        assert_eq!(ids(&list), vec![100]);
    }

    #[test]
    fn closed_list_drops_responses() {
        let mut list = PagedList::new();
        let t = list.begin_reset().unwrap();
        list.close();
        let (posts, pg) = page(0..2, None, false);
        assert!(!list.complete(&t, posts, pg));
        assert!(list.items().is_empty());
        assert!(list.begin_reset().is_none());
    }

    #[test]
    fn redacted_posts_are_never_visible() {
        let mut list = PagedList::new();
        let t = list.begin_reset().unwrap();
        let (mut posts, pg) = page(0..3, None, false);
        posts[1].redacted = true;
        list.complete(&t, posts, pg);

        assert_eq!(list.items().len(), 3);
        assert_eq!(ids(&list), vec![0, 2]);
        assert_eq!(list.visible_count(), 2);
        assert!(!list.is_empty_visible());
    }

    #[test]
    fn failure_keeps_items_and_allows_retry() {
        let mut list = PagedList::new();
        let t = list.begin_reset().unwrap();
        let (posts, pg) = page(0..2, Some("c1"), true);
        list.complete(&t, posts, pg);

        let more = list.begin_load_more().unwrap();
        let err = ClientError::Api { status: 500, message: String::new() };
        list.settle(&more, Err(err), "Failed to load posts. Please try again.");

        assert_eq!(list.error(), Some("Failed to load posts. Please try again."));
        assert!(list.can_retry());
        assert_eq!(ids(&list), vec![0, 1]);
        assert!(list.begin_load_more().is_some());
        assert_eq!(list.error(), None);
        assert!(!list.can_retry());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let mut list = PagedList::new();
        let t = list.begin_reset().unwrap();
        let err = ClientError::Api { status: 404, message: "User not found".into() };
        list.settle(&t, Err(err), "fallback");

        assert_eq!(list.error(), Some("User not found"));
        assert!(!list.can_retry());
    }
}
