//! Client configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for deployment.
//! Config precedence: env vars > .env file > microblog.toml > defaults

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Default API root, matching the backend's development server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Storage key under which the bearer token is persisted.
pub const DEFAULT_TOKEN_KEY: &str = "jwt_token";

/// Initialize the global configuration from environment.
///
/// Loads once; later calls return the first result.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let app_config = load("microblog")?;
    Ok(CONFIG.get_or_init(|| app_config))
}

/// Build a config from defaults, the optional `file` (extension inferred) and `MICROBLOG__*` env vars.
pub fn load(file: &str) -> Result<AppConfig, config::ConfigError> {
    let cfg = config::Config::builder()
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("storage.path", ".microblog/storage.json")?
        .set_default("storage.token_key", DEFAULT_TOKEN_KEY)?
        .set_default("log.filter", "microblog=info")?
        .add_source(config::File::with_name(file).required(false))
        // MICROBLOG_API__BASE_URL, MICROBLOG_STORAGE__PATH, ...
        .add_source(
            config::Environment::with_prefix("MICROBLOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Root of the REST API, e.g. `https://microblog.example.com/api/v1`.
    /// Maps to `MICROBLOG_API__BASE_URL`.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file standing in for the browser's local storage.
    pub path: PathBuf,
    pub token_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file() {
        let cfg = load("does-not-exist-microblog-test").expect("defaults should load");
        assert_eq!(cfg.storage.token_key, DEFAULT_TOKEN_KEY);
        assert!(cfg.api.base_url.starts_with("http"));
        assert!(!cfg.log.filter.is_empty());
    }
}
