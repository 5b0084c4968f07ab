//! Configuration system
//!
//! Handles YAML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::{ConfigFile, DEFAULT_CONFIG_PATH};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shared HTTP settings
    pub http: HttpConfig,
    /// Data sources
    pub integrations: IntegrationsConfig,
    /// Delivery channels
    #[serde(alias = "alerts")]
    pub alert: AlertConfig,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request deadline in seconds
    #[serde(rename = "timeoutSeconds", alias = "timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Source sub-configs; an absent block means the source is disabled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    pub gitlab: Option<GitLabConfig>,
    pub rss: Option<RssConfig>,
}

/// Review platform settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    pub enabled: Option<EnabledFlag>,
    #[serde(rename = "baseURL", alias = "base_url", alias = "baseUrl")]
    pub base_url: String,
    pub token: String,
    pub listen: ListenConfig,
}

/// What to scan on the review platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Group ids, scanned in this order
    pub groups: Vec<u64>,
}

/// Feed scanner settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RssConfig {
    pub enabled: Option<EnabledFlag>,
    pub sources: Vec<RssSourceConfig>,
}

/// One feed to watch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RssSourceConfig {
    pub url: String,
    /// Lookback as a duration string, e.g. "18h"
    pub since: String,
    #[serde(rename = "matchTitle", alias = "match_title")]
    pub match_title: MatchTitleConfig,
}

/// Title filter: an item matches if any regex matches or any substring is contained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTitleConfig {
    pub regex: Vec<String>,
    pub contains: Vec<String>,
}

/// Alerter sub-configs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub slack: Option<SlackConfig>,
}

/// Chat webhook settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub enabled: Option<EnabledFlag>,
    pub webhook: String,
    pub channel: String,
    pub username: String,
    /// Either an `:emoji:` or an image URL
    pub icon: String,
}

/// Enable flag written either as a YAML bool or as a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnabledFlag {
    Bool(bool),
    Text(String),
}

impl EnabledFlag {
    /// Resolve the flag; an empty string counts as enabled
    pub fn is_enabled(&self) -> bool {
        match self {
            EnabledFlag::Bool(b) => *b,
            EnabledFlag::Text(s) => match s.trim() {
                "" => true,
                "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
                "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
                other => {
                    log::warn!("Unrecognized enabled flag '{}', treating as disabled", other);
                    false
                }
            },
        }
    }
}

/// Presence plus flag check shared by every source and alerter
pub fn block_enabled(flag: Option<&EnabledFlag>) -> bool {
    flag.map(EnabledFlag::is_enabled).unwrap_or(true)
}
