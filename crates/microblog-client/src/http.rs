//! HTTP client wrapper for the Microblog API.
//!
//! Every request carries `Authorization: Bearer <token>` when a token is stored. A 401 triggers
//! at most one silent refresh and one replay of the original request; if the refresh fails the
//! token is purged and the user is sent to the login route.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use microblog_common::error::ApiErrorBody;

use crate::error::{ClientError, Result};
use crate::navigation::{Navigator, Route};
use crate::storage::TokenStore;

/// Per-request progress through the refresh-and-replay path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    NotAttempted,
    Refreshing,
    Retried,
}

struct Outgoing<'a> {
    method: Method,
    path: &'a str,
    query: &'a [(&'a str, &'a str)],
    body: Option<&'a Value>,
    /// Credential exchanges (login) answer 401 for bad input, not for an expired token.
    refresh_on_401: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Callback run once a failed refresh has ended the session.
type ExpiryHook = Arc<dyn Fn() + Send + Sync + 'static>;

/// Async Microblog REST client.
///
/// Cheap to clone; clones share the HTTP connection pool, cookie jar, token store and navigator.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Arc<str>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    on_expire: Arc<Mutex<Vec<ExpiryHook>>>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Cookie jar stands in for the browser's credentialed requests; the refresh
        // endpoint relies on it.
        let http = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
            tokens,
            navigator,
            on_expire: Arc::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Register a callback for when a failed refresh ends the session. Shared by all clones.
    pub fn on_session_expired(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.on_expire
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(hook));
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    async fn request<T: DeserializeOwned>(&self, out: Outgoing<'_>) -> Result<T> {
        let mut state = RetryState::NotAttempted;
        loop {
            let resp = self.dispatch(&out).await?;
            if resp.status() != StatusCode::UNAUTHORIZED {
                return decode(resp).await;
            }

            if !out.refresh_on_401 || state != RetryState::NotAttempted {
                return Err(unauthorized(resp).await);
            }

            state = RetryState::Refreshing;
            tracing::debug!(path = out.path, ?state, "401 received, refreshing token");
            match self.refresh().await {
                Ok(Some(_)) => {
                    state = RetryState::Retried;
                    tracing::debug!(path = out.path, ?state, "replaying request");
                }
                // Refresh succeeded but issued nothing new; the original 401 stands.
                Ok(None) => return Err(unauthorized(resp).await),
                Err(e) => {
                    tracing::warn!(path = out.path, "token refresh failed: {e}");
                    self.expire_session();
                    return Err(ClientError::SessionExpired);
                }
            }
        }
    }

    async fn dispatch(&self, out: &Outgoing<'_>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, out.path);
        let mut req = self.http.request(out.method.clone(), &url);
        if !out.query.is_empty() {
            req = req.query(out.query);
        }
        if let Some(token) = self.tokens.get() {
            req = req.bearer_auth(token);
        }
        if let Some(b) = out.body {
            req = req.json(b);
        }
        tracing::debug!(method = %out.method, path = out.path, "dispatch");
        Ok(req.send().await?)
    }

    /// Drop the dead session and head for the login screen.
    fn expire_session(&self) {
        self.tokens.clear();
        let hooks = self.on_expire.lock().unwrap_or_else(PoisonError::into_inner).clone();
        for hook in hooks {
            hook();
        }
        if self.navigator.current() != Route::Login {
            self.navigator.navigate(Route::Login);
        }
    }

    /// Exchange the refresh cookie for a new bearer token.
    ///
    /// Sent without the (expired) bearer token and never intercepted. A returned token is
    /// stored before this resolves.
    pub async fn refresh(&self) -> Result<Option<String>> {
        let url = format!("{}/refresh", self.base_url);
        let resp = self.http.post(&url).json(&serde_json::json!({})).send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(unauthorized(resp).await);
        }
        let body: RefreshResponse = decode(resp).await?;
        if let Some(token) = &body.token {
            self.tokens.set(token);
        }
        Ok(body.token)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.request(Outgoing {
            method: Method::GET,
            path,
            query,
            body: None,
            refresh_on_401: true,
        })
        .await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::POST, path, None).await
    }

    /// POST credentials. A 401 here means bad credentials and is returned as-is.
    pub async fn post_credentials<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        self.request(Outgoing {
            method: Method::POST,
            path,
            query: &[],
            body: Some(body),
            refresh_on_401: false,
        })
        .await
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        self.request(Outgoing { method, path, query: &[], body, refresh_on_401: true })
            .await
    }
}

/// Turn a response into `T`, or into an API error carrying the server's message.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let message = error_message(resp).await;
        return Err(ClientError::Api { status: status.as_u16(), message });
    }
    let bytes = resp.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null).map_err(ClientError::Json);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

async fn unauthorized(resp: Response) -> ClientError {
    ClientError::Unauthorized { message: error_message(resp).await }
}

/// The server's explanation, or empty so the caller's fallback text applies.
async fn error_message(resp: Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    ApiErrorBody::parse(&body)
        .and_then(|b| b.message())
        .unwrap_or_default()
}
