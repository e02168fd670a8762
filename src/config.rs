//! Service configuration
//!
//! The base URL of the prediction service is seeded once at startup from
//! layered configuration and afterwards changes only through
//! [`ConfigStore::update`]. Saved values live for the session only.

use std::sync::Arc;
use std::time::Duration;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Where predictions go when nobody configured anything.
pub const DEFAULT_API_URL: &str = "https://diabetis-prediction-api.onrender.com";

/// Prefix for environment overrides, e.g. `RISK_PREDICTOR_API_URL`.
pub const ENV_PREFIX: &str = "RISK_PREDICTOR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Startup settings, read from `config/default.toml`, an optional
/// environment-specific file and `RISK_PREDICTOR_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Load settings, letting `api_url` (from the command line) win over
    /// every other source.
    pub fn load(api_url: Option<&str>) -> Result<Self, ConfigError> {
        let env = std::env::var(format!("{}_ENV", ENV_PREFIX))
            .unwrap_or_else(|_| "development".into());

        let mut builder = config::Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        if let Some(url) = api_url {
            builder = builder.set_override("api_url", url)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        debug!(env = %env, api_url = %settings.api_url, "loaded settings");
        Ok(settings)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            base_url: self.api_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Unset means the request waits for the network layer.
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
        }
    }
}

/// Session-lifetime holder of the service base URL.
#[derive(Debug)]
pub struct ConfigStore {
    base_url: RwLock<String>,
}

impl ConfigStore {
    pub fn new(config: &ServiceConfig) -> Arc<Self> {
        Arc::new(Self {
            base_url: RwLock::new(config.base_url.clone()),
        })
    }

    pub async fn base_url(&self) -> String {
        self.base_url.read().await.clone()
    }

    /// Replaces the stored URL unconditionally. No format check is made;
    /// a bad URL surfaces as a failed request later.
    pub async fn update(&self, url: impl Into<String>) {
        let url = url.into();
        info!(api_url = %url, "API URL updated");
        *self.base_url.write().await = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_starts_from_default() {
        let store = ConfigStore::new(&ServiceConfig::default());
        assert_eq!(store.base_url().await, DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn update_accepts_any_string() {
        let store = ConfigStore::new(&ServiceConfig::default());
        store.update("not a url").await;
        assert_eq!(store.base_url().await, "not a url");

        store.update("http://localhost:8000").await;
        assert_eq!(store.base_url().await, "http://localhost:8000");
    }

    #[test]
    fn environment_overrides_files() {
        std::env::set_var("RISK_PREDICTOR_API_URL", "http://10.0.0.5:8000");
        std::env::set_var("RISK_PREDICTOR_REQUEST_TIMEOUT_SECS", "7");

        let settings = Settings::load(None);
        std::env::remove_var("RISK_PREDICTOR_API_URL");
        std::env::remove_var("RISK_PREDICTOR_REQUEST_TIMEOUT_SECS");

        let config = settings.unwrap().service_config();
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(7)));
    }

    #[test]
    fn command_line_url_wins() {
        let settings = Settings::load(Some("http://127.0.0.1:9000")).unwrap();
        assert_eq!(settings.api_url, "http://127.0.0.1:9000");
        assert_eq!(settings.service_config().base_url, "http://127.0.0.1:9000");
    }
}
