//! Routes, the navigation seam, and route guards.
//!
//! The HTTP wrapper only needs to send the user to the login screen when a session dies;
//! everything else about navigation belongs to the front end driving the views.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Feed,
    Login,
    Signup,
    Post(i64),
    User(i64),
    Settings,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Feed => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Signup => "/signup".to_owned(),
            Self::Post(id) => format!("/posts/{id}"),
            Self::User(id) => format!("/users/{id}"),
            Self::Settings => "/settings".to_owned(),
        }
    }

    /// Parse a location path. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] => Some(Self::Feed),
            ["login"] => Some(Self::Login),
            ["signup"] => Some(Self::Signup),
            ["settings"] => Some(Self::Settings),
            ["posts", id] => id.parse().ok().map(Self::Post),
            ["users", id] => id.parse().ok().map(Self::User),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the user currently is, and a way to send them elsewhere.
pub trait Navigator: Send + Sync {
    fn current(&self) -> Route;
    fn navigate(&self, to: Route);
}

/// Navigator that records every move. Used by the terminal front end and tests.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl MemoryNavigator {
    pub fn new(start: Route) -> Self {
        Self { history: Mutex::new(vec![start]) }
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new(Route::Feed)
    }
}

impl Navigator for MemoryNavigator {
    fn current(&self) -> Route {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
            .unwrap_or(Route::Feed)
    }

    fn navigate(&self, to: Route) {
        tracing::debug!(route = %to, "navigate");
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(to);
    }
}

/// Outcome of checking a route against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Session still bootstrapping; show a loading indicator.
    Loading,
    Render,
    Redirect(Route),
}

/// Settings requires a signed-in user; login and signup are for guests only.
pub fn guard(route: Route, session: &Session) -> Guard {
    if session.loading {
        return Guard::Loading;
    }
    let signed_in = session.current_user.is_some();
    match route {
        Route::Settings if !signed_in => Guard::Redirect(Route::Login),
        Route::Login | Route::Signup if signed_in => Guard::Redirect(Route::Feed),
        _ => Guard::Render,
    }
}
