//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Holds the collaborator for each contract and
//! the runtime configuration. Cloning is cheap: collaborators are behind
//! `Arc`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::services::{AccessService, DiscoveryService, SeedData, SubscriptionService};

/// Default request body limit: 2 MiB.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Errors raised while loading configuration or seed data.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot read seed file {path}: {source}")]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse seed file {path}: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Deadline applied to every collaborator call. `None` disables it.
    pub request_timeout: Option<Duration>,
    pub body_limit_bytes: usize,
    pub log_format: LogFormat,
    /// JSON file used to populate the in-memory collaborators.
    pub seed_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            request_timeout: None,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            log_format: LogFormat::Text,
            seed_file: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `SECOM_PORT` (falls back to `PORT`) | 8080 |
    /// | `SECOM_REQUEST_TIMEOUT_MS` | no deadline |
    /// | `SECOM_BODY_LIMIT_BYTES` | 2 MiB |
    /// | `SECOM_LOG_FORMAT` (`text` or `json`) | `text` |
    /// | `SECOM_SEED_FILE` | none |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("SECOM_PORT").map(|v| ("SECOM_PORT", v)) {
            Some(found) => Some(found),
            None => lookup("PORT").map(|v| ("PORT", v)),
        };
        let port = match port {
            Some((var, value)) => parse(var, &value)?,
            None => defaults.port,
        };

        let request_timeout = match lookup("SECOM_REQUEST_TIMEOUT_MS") {
            Some(value) => {
                let ms: u64 = parse("SECOM_REQUEST_TIMEOUT_MS", &value)?;
                if ms == 0 {
                    return Err(invalid(
                        "SECOM_REQUEST_TIMEOUT_MS",
                        &value,
                        "must be greater than 0",
                    ));
                }
                Some(Duration::from_millis(ms))
            }
            None => None,
        };

        let body_limit_bytes = match lookup("SECOM_BODY_LIMIT_BYTES") {
            Some(value) => parse("SECOM_BODY_LIMIT_BYTES", &value)?,
            None => defaults.body_limit_bytes,
        };

        let log_format = match lookup("SECOM_LOG_FORMAT") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "text" | "" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(invalid("SECOM_LOG_FORMAT", &value, "expected text or json")),
            },
            None => defaults.log_format,
        };

        let seed_file = lookup("SECOM_SEED_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            request_timeout,
            body_limit_bytes,
            log_format,
            seed_file,
        })
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, value, &e.to_string()))
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access: Arc<dyn AccessService>,
    pub discovery: Arc<dyn DiscoveryService>,
    pub subscriptions: Arc<dyn SubscriptionService>,
    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Empty in-memory collaborators with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Empty in-memory collaborators.
    pub fn with_config(config: AppConfig) -> Self {
        Self::from_seed(config, &SeedData::default())
    }

    /// In-memory collaborators populated from seed data.
    pub fn from_seed(config: AppConfig, seed: &SeedData) -> Self {
        Self {
            access: Arc::new(seed.access_policy()),
            discovery: Arc::new(seed.registry()),
            subscriptions: Arc::new(seed.subscription_store()),
            config,
        }
    }

    /// Load the seed file named in `config`, if any.
    pub fn load(config: AppConfig) -> Result<Self, ConfigError> {
        let seed = match &config.seed_file {
            Some(path) => SeedData::from_file(path)?,
            None => SeedData::default(),
        };
        tracing::info!(
            granted_identities = seed.granted_identities.len(),
            instances = seed.instances.len(),
            subscriptions = seed.subscriptions.len(),
            "collaborators seeded"
        );
        Ok(Self::from_seed(config, &seed))
    }

    pub fn with_access(mut self, access: Arc<dyn AccessService>) -> Self {
        self.access = access;
        self
    }

    pub fn with_discovery(mut self, discovery: Arc<dyn DiscoveryService>) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn with_subscriptions(mut self, subscriptions: Arc<dyn SubscriptionService>) -> Self {
        self.subscriptions = subscriptions;
        self
    }

    /// Deadline for collaborator calls.
    pub fn deadline(&self) -> Option<Duration> {
        self.config.request_timeout
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
