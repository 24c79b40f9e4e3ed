//! In-process stand-in for the Microblog API, used by the unit tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::Response;
use serde_json::{Value, json};

use crate::http::ApiClient;
use crate::navigation::{MemoryNavigator, Route};
use crate::storage::MemoryTokenStore;

const PREFIX: &str = "/api/v1";

/// One request as the mock server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path below the API prefix, e.g. `/posts/3`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

pub struct MockApi {
    pub base_url: String,
    log: Log,
}

impl MockApi {
    /// Serve `routes` under `/api/v1` on an ephemeral port.
    pub async fn serve(routes: Router) -> Self {
        let log: Log = Arc::default();
        let app = Router::new()
            .nest(PREFIX, routes)
            .layer(middleware::from_fn_with_state(log.clone(), record));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}{PREFIX}"), log }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Client wired to this server with fresh in-memory token store and navigator.
    pub fn client(&self, token: Option<&str>) -> Harness {
        let tokens = Arc::new(token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token));
        let navigator = Arc::new(MemoryNavigator::new(Route::Feed));
        let client = ApiClient::new(&self.base_url, tokens.clone(), navigator.clone()).unwrap();
        Harness { client, tokens, navigator }
    }
}

pub struct Harness {
    pub client: ApiClient,
    pub tokens: Arc<MemoryTokenStore>,
    pub navigator: Arc<MemoryNavigator>,
}

async fn record(State(log): State<Log>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts.uri.path();
    log.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path: path.strip_prefix(PREFIX).unwrap_or(path).to_owned(),
        query: parts.uri.query().map(str::to_owned),
        authorization: parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Bearer token from request headers, if any.
pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({ "id": id, "username": username, "description": null })
}

pub fn post_json(id: i64, content: &str, author_id: i64) -> Value {
    json!({
        "id": id,
        "content": content,
        "author": user_json(author_id, &format!("testuser{author_id}")),
        "created_at": "2024-01-01T12:00:00Z",
        "parent_id": null,
        "replies_count": 0,
        "redacted": false
    })
}
