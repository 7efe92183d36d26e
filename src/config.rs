//! Configuration loading and validation.
//!
//! Configuration comes from a TOML file, with secrets overridable from the
//! environment (`PAGEWATCH_API_TOKEN`, `PAGEWATCH_WEBHOOK_URL`) so tokens
//! never have to live on disk. Validation failures here are the only fatal
//! errors in the process; everything after startup is log-and-continue.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Env var that overrides `[store] token`.
pub const ENV_API_TOKEN: &str = "PAGEWATCH_API_TOKEN";
/// Env var that overrides `[webhook] url`.
pub const ENV_WEBHOOK_URL: &str = "PAGEWATCH_WEBHOOK_URL";

/// Top-level configuration for the watcher process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WatchConfig {
    pub store: StoreConfig,
    pub webhook: WebhookConfig,
    pub poll: PollConfig,
}

/// Connection settings for the remote page database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the page database API.
    pub base_url: String,
    /// Bearer token for API auth.
    pub token: String,
    /// Id of the database to watch.
    pub database_id: String,
    /// Per-request timeout for database queries.
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            database_id: String::new(),
            request_timeout_secs: 10,
        }
    }
}

/// Where and as whom notifications are posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: String,
    pub username: String,
    pub avatar_url: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: "pagewatch".to_string(),
            avatar_url: String::new(),
        }
    }
}

/// Polling cadence and debounce window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between polling ticks.
    pub interval_secs: u64,
    /// Minimum age before a changed-page entry flushes.
    pub quiet_period_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            quiet_period_secs: 120,
        }
    }
}

impl WatchConfig {
    /// Load configuration from a TOML file and apply env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let mut config: WatchConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        config.override_from(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply secret overrides from an environment lookup.
    pub fn override_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(token) = get(ENV_API_TOKEN) {
            self.store.token = token;
        }
        if let Some(url) = get(ENV_WEBHOOK_URL) {
            self.webhook.url = url;
        }
    }

    /// Reject configurations the process cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.store.base_url.is_empty() {
            bail!("[store] base_url is required");
        }
        if self.store.token.is_empty() {
            bail!("[store] token is required (or set {})", ENV_API_TOKEN);
        }
        if self.store.database_id.is_empty() {
            bail!("[store] database_id is required");
        }
        if self.store.request_timeout_secs == 0 {
            bail!("[store] request_timeout_secs must be greater than zero");
        }
        if self.webhook.url.is_empty() {
            bail!("[webhook] url is required (or set {})", ENV_WEBHOOK_URL);
        }
        if self.poll.interval_secs == 0 {
            bail!("[poll] interval_secs must be greater than zero");
        }
        Ok(())
    }
}
