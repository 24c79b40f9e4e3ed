//! Session context: who is signed in, shared by every view.
//!
//! An explicit store handed to views rather than ambient global state. Clones share one
//! state, published on a `watch` channel so front ends can re-render on change.

use std::sync::Arc;

use tokio::sync::watch;

use microblog_common::models::{SignupForm, User};

use crate::defer::Defer;
use crate::error::Result;
use crate::services::AuthService;

/// Current identity. `current_user` is set only after the server has vouched for the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub current_user: Option<User>,
    /// True until [`SessionStore::bootstrap`] finishes.
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self { current_user: None, loading: true }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    auth: AuthService,
    state: Arc<watch::Sender<Session>>,
}

impl SessionStore {
    /// The store forgets the user whenever the client reports the session expired.
    pub fn new(auth: AuthService) -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        let state = Arc::new(tx);
        let expired = state.clone();
        auth.api().on_session_expired(move || {
            tracing::info!("session expired, signing out");
            expired.send_modify(|s| {
                s.current_user = None;
                s.loading = false;
            });
        });
        Self { auth, state }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().current_user.is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Identity is resolved once a user is set or cleared, so loading ends here too.
    fn set_current_user(&self, user: Option<User>) {
        self.state.send_modify(|s| {
            s.current_user = user;
            s.loading = false;
        });
    }

    /// Validate a stored token against `/me`.
    ///
    /// Any failure purges the token. The loading flag is cleared however this returns.
    pub async fn bootstrap(&self) {
        let state = self.state.clone();
        let _done = Defer::new(move || state.send_modify(|s| s.loading = false));

        if !self.auth.is_authenticated() {
            return;
        }
        match self.auth.current_user().await {
            Ok(user) => {
                tracing::info!(username = %user.username, "session restored");
                self.set_current_user(Some(user));
            }
            Err(e) => {
                tracing::info!("stored token rejected: {e}");
                self.auth.clear_token();
                self.set_current_user(None);
            }
        }
    }

    /// Log in and record the user. Failures propagate unchanged.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let resp = self.auth.login(username, password).await?;
        self.set_current_user(Some(resp.user.clone()));
        Ok(resp.user)
    }

    /// Create the account, then log in with the same credentials.
    ///
    /// If the automatic login fails the new account still becomes the current identity and
    /// the login error is logged rather than returned.
    pub async fn signup(&self, form: &SignupForm) -> Result<User> {
        let created = self.auth.signup(form).await?;
        let user = match self.auth.login(&form.username, &form.password).await {
            Ok(resp) => resp.user,
            Err(e) => {
                tracing::warn!(username = %created.username, "auto-login after signup failed: {e}");
                created
            }
        };
        self.set_current_user(Some(user.clone()));
        Ok(user)
    }

    /// End the session. Local state is cleared even when the server call fails.
    pub async fn logout(&self) {
        let state = self.state.clone();
        let _clear = Defer::new(move || state.send_modify(|s| s.current_user = None));

        if let Err(e) = self.auth.logout().await {
            tracing::warn!("server logout failed, cleared local session anyway: {e}");
        } else {
            tracing::info!("logged out");
        }
    }

    /// Replace the current user after a profile update.
    pub fn set_user(&self, user: User) {
        self.set_current_user(Some(user));
    }

    /// Drop token and identity without a server call (e.g. after account deletion).
    pub fn clear_local(&self) {
        self.auth.clear_token();
        self.set_current_user(None);
    }
}
