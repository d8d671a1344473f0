//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.hookline/config.json`) and environment.
//! The webhook URL and self-forwarding switch come from the environment only.

use crate::webhook::SinkKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Receiver used when `WEBHOOK_URL` is unset or empty.
pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:8769/whatsapp/webhook";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Outbound webhook client settings.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// HTTP client and reporting settings for the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    /// Whole-request timeout in seconds (default 15). Zero falls back to the default.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header. Defaults to `hookline/<version>`.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Where outcome lines go. "log" (default) goes through the logger, so lines carry its
    /// timestamp/level prefix and land on stderr under env_logger. "stdout" prints the bare
    /// `✓ ...` / `⚠ ...` lines, which is what line-anchored greps expect.
    #[serde(default)]
    pub sink: SinkKind,
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            sink: SinkKind::default(),
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> std::time::Duration {
        let secs = if self.timeout_secs == 0 {
            default_timeout_secs()
        } else {
            self.timeout_secs
        };
        std::time::Duration::from_secs(secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("hookline/{}", env!("CARGO_PKG_VERSION")))
    }
}

/// Resolve the receiver URL from `WEBHOOK_URL`, falling back to [`DEFAULT_WEBHOOK_URL`].
pub fn resolve_webhook_url() -> String {
    webhook_url_from(std::env::var("WEBHOOK_URL").ok())
}

/// A set, non-empty value is used verbatim; anything else yields the default.
pub fn webhook_url_from(value: Option<String>) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string())
}

/// True only when `FORWARD_SELF` is exactly `true`.
pub fn resolve_forward_self() -> bool {
    forward_self_from(std::env::var("FORWARD_SELF").ok())
}

/// Case-sensitive: `TRUE`, `1` and `yes` all leave self-forwarding off.
pub fn forward_self_from(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("HOOKLINE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".hookline").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, else the default path (or HOOKLINE_CONFIG_PATH).
/// Missing file => default config. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
