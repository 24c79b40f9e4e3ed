//! Plain-text rendering for terminal front ends.

use chrono::{DateTime, Utc};

use microblog_common::models::{Post, User};
use microblog_common::time::format_relative;

use crate::navigation::Route;
use crate::session::Session;

pub const EMPTY_FEED: &str = "No posts yet. Be the first to post!";

/// Top bar: who is signed in, or where to sign in.
pub fn header(session: &Session) -> String {
    if session.loading {
        return "Microblog | Loading...".to_owned();
    }
    match &session.current_user {
        Some(user) => format!("Microblog | {} | Settings | Logout", user.handle()),
        None => "Microblog | Login | Sign Up".to_owned(),
    }
}

pub fn replies_label(count: u32) -> String {
    match count {
        0 => "Reply".to_owned(),
        1 => "1 reply".to_owned(),
        n => format!("{n} replies"),
    }
}

/// One post. Redacted posts render as nothing.
pub fn post_card(post: &Post, now: DateTime<Utc>) -> String {
    if post.redacted {
        return String::new();
    }
    let mut out = format!("#{} {}", post.id, post.author.handle());
    if let Some(description) = post.author.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!(" ({description})"));
    }
    out.push_str(&format!(
        " · {}\n{}\n{}",
        format_relative(post.created_at, now),
        post.content,
        replies_label(post.replies_count),
    ));
    if let Some(parent) = post.parent_id {
        out.push_str(&format!(" · View thread {}", Route::Post(parent)));
    }
    out
}

/// Posts separated by blank lines, or the empty-feed placeholder.
pub fn post_list<'a>(posts: impl IntoIterator<Item = &'a Post>, now: DateTime<Utc>) -> String {
    let cards: Vec<String> = posts
        .into_iter()
        .filter(|p| !p.redacted)
        .map(|p| post_card(p, now))
        .collect();
    if cards.is_empty() {
        EMPTY_FEED.to_owned()
    } else {
        cards.join("\n\n")
    }
}

pub fn profile_header(user: &User, post_count_label: &str) -> String {
    let mut out = format!("{} ({post_count_label})", user.handle());
    if let Some(description) = user.description.as_deref().filter(|d| !d.is_empty()) {
        out.push('\n');
        out.push_str(description);
    }
    out
}
