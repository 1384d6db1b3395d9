use std::time::Duration;

use naff_backend::RetryPolicy;
use naff_types::IdentityConfig;
use serde::Deserialize;

/// Environment variable that overrides `backend.url`.
pub const BACKEND_ENV: &str = "PUBLIC_BACKEND";

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub identity: IdentityConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub max_attempts: usize,
    pub backoff_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5173,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            url: "http://0.0.0.0:8080".into(),
            timeout_secs: 10,
            max_attempts: retry.max_attempts,
            backoff_ms: retry.base_backoff_ms,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_backoff_ms: self.backoff_ms,
        }
    }
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn with_backend_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend.url = url;
        }
        self.backend.url = self.backend.url.trim().trim_end_matches('/').to_string();
        self
    }
}

pub fn load(path: &str) -> Config {
    let config = match std::fs::read_to_string(path) {
        Ok(contents) => match Config::parse(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("failed to parse config {path}: {e}, using defaults");
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!("failed to read config {path}: {e}, using defaults");
            Config::default()
        }
    };

    config.with_backend_override(std::env::var(BACKEND_ENV).ok())
}
