//! Bearer token persistence.
//!
//! The token is the only state the client keeps across runs. Exactly one token is held at a
//! time: every `set` overwrites the previous value.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

/// Synchronous key/value slot for the bearer token, in the manner of browser local storage.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);

    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

/// In-process token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Token kept under one key of a JSON object file. Other keys in the file are preserved.
///
/// A missing or unreadable file reads as empty. Write failures are logged and dropped, the
/// same way a full or disabled local storage behaves in a browser.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self { path: path.into(), key: key.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Map<String, Value> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::warn!(path = %self.path.display(), "storage file is not a JSON object, ignoring");
                Map::new()
            }
        }
    }

    fn write_all(&self, map: Map<String, Value>) {
        let result = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| {
                let body = serde_json::to_string_pretty(&Value::Object(map))?;
                fs::write(&self.path, body)
            });
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), "failed to write storage file: {e}");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.read_all()
            .get(&self.key)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    fn set(&self, token: &str) {
        let mut map = self.read_all();
        map.insert(self.key.clone(), Value::String(token.to_owned()));
        self.write_all(map);
    }

    fn clear(&self) {
        let mut map = self.read_all();
        if map.remove(&self.key).is_some() {
            self.write_all(map);
        }
    }
}
