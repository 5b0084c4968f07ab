//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    pub fn with_file(mut self, path: &str) -> Result<Self, ConfigError> {
        let resolved = ConfigFile::resolve(path);
        self.config = ConfigFile::load(&resolved)?;
        log::debug!("Loaded config from {}", resolved.display());
        Ok(self)
    }

    /// Override the review platform token
    pub fn with_gitlab_token(mut self, token: Option<String>) -> Self {
        if let (Some(t), Some(gitlab)) = (token, self.config.integrations.gitlab.as_mut()) {
            gitlab.token = t;
        }
        self
    }

    /// Override the chat webhook URL
    pub fn with_slack_webhook(mut self, webhook: Option<String>) -> Self {
        if let (Some(w), Some(slack)) = (webhook, self.config.alert.slack.as_mut()) {
            slack.webhook = w;
        }
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        if let Some(s) = seconds {
            self.config.http.timeout_seconds = s;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        Self { config }
    }
}
