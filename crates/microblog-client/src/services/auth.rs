//! Authentication calls: login, signup, logout, current user, token refresh.

use serde::Deserialize;
use serde_json::{Value, json};

use microblog_common::models::{SignupForm, User};
use microblog_common::validation::validate_request;

use crate::defer::Defer;
use crate::error::Result;
use crate::http::ApiClient;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Exchange credentials for a session. A returned token replaces any stored one.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let resp: LoginResponse = self
            .api
            .post_credentials("/login", &json!({ "username": username, "password": password }))
            .await?;
        if let Some(token) = &resp.token {
            self.api.tokens().set(token);
        }
        tracing::info!(username = %resp.user.username, "logged in");
        Ok(resp)
    }

    /// Create an account. Does not log in.
    pub async fn signup(&self, form: &SignupForm) -> Result<User> {
        validate_request(form)?;
        let resp: UserEnvelope = self.api.post("/users", &json!({ "user": form })).await?;
        Ok(resp.user)
    }

    /// End the server session. The local token is cleared on every exit path; the server's
    /// answer is still returned.
    pub async fn logout(&self) -> Result<()> {
        let tokens = self.api.tokens().clone();
        let _clear = Defer::new(move || tokens.clear());
        self.api.delete::<Value>("/logout").await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User> {
        let resp: UserEnvelope = self.api.get("/me").await?;
        Ok(resp.user)
    }

    /// Ask for a new token; stored if the server issues one.
    pub async fn refresh_token(&self) -> Result<Option<String>> {
        self.api.refresh().await
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.tokens().is_present()
    }

    pub fn token(&self) -> Option<String> {
        self.api.tokens().get()
    }

    /// Forget the stored token without telling the server.
    pub fn clear_token(&self) {
        self.api.tokens().clear();
    }
}
