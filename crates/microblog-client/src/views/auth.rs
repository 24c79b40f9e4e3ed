//! Login and signup forms.
//!
//! Both land on the feed when they succeed and stay put with an error when they don't.

use microblog_common::models::SignupForm;

use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const SIGNUP_FAILED: &str = "Signup failed. Please try again.";

#[derive(Debug, Default)]
pub struct LoginView {
    pub username: String,
    pub password: String,
    submitting: bool,
    error: Option<String>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn button_label(&self) -> &'static str {
        if self.submitting { "Logging in..." } else { "Login" }
    }

    pub async fn submit(&mut self, session: &SessionStore, navigator: &dyn Navigator) -> bool {
        self.error = None;
        self.submitting = true;
        let result = session.login(&self.username, &self.password).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.password.clear();
                navigator.navigate(Route::Feed);
                true
            }
            Err(e) => {
                tracing::debug!("login rejected: {e}");
                self.error = Some(e.user_message(LOGIN_FAILED));
                false
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SignupView {
    pub username: String,
    pub password: String,
    pub description: String,
    submitting: bool,
    error: Option<String>,
}

impl SignupView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn button_label(&self) -> &'static str {
        if self.submitting { "Creating account..." } else { "Sign Up" }
    }

    fn form(&self) -> SignupForm {
        let description = Some(self.description.trim().to_owned()).filter(|d| !d.is_empty());
        SignupForm::new(self.username.trim(), self.password.clone(), description)
    }

    pub async fn submit(&mut self, session: &SessionStore, navigator: &dyn Navigator) -> bool {
        self.error = None;
        self.submitting = true;
        let result = session.signup(&self.form()).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.password.clear();
                navigator.navigate(Route::Feed);
                true
            }
            Err(e) => {
                tracing::debug!("signup rejected: {e}");
                self.error = Some(e.user_message(SIGNUP_FAILED));
                false
            }
        }
    }
}
