//! Data sources
//!
//! A source checks its config, fetches its data and renders it into a chat
//! message. The set of sources is fixed and iterated in registration order.

pub mod gitlab;
pub mod rss;

pub use gitlab::GitLabSource;
pub use rss::RssSource;

use crate::clock::SharedClock;
use crate::config::IntegrationsConfig;
use crate::domain::{Message, MessageOptions};
use crate::error::{FetchError, RenderError, ValidationError};
use crate::feed::HttpFeedFetcher;
use crate::gitlab::HttpConnector;

use reqwest::blocking::Client;
use std::time::Duration;

/// Capability shared by every source
pub trait Source {
    /// Name used in logs and error context
    fn name(&self) -> &str;

    /// Whether the source's config block is present and switched on
    fn enabled(&self, config: &IntegrationsConfig) -> bool;

    /// Check required fields; runs before any network call
    fn validate(&self, config: &IntegrationsConfig) -> Result<(), ValidationError>;

    /// Fetch everything and replace the stored scan result
    fn load(&mut self, config: &IntegrationsConfig) -> Result<(), FetchError>;

    /// Render the stored scan result; fails before a successful `load`
    fn generate_message(&self, options: &MessageOptions) -> Result<Message, RenderError>;
}

/// Production sources in run order
pub fn default_sources(
    client: Client,
    timeout: Duration,
    clock: SharedClock,
) -> Vec<Box<dyn Source>> {
    vec![
        Box::new(GitLabSource::new(HttpConnector::new(timeout), clock.clone())),
        Box::new(RssSource::new(HttpFeedFetcher::new(client), clock)),
    ]
}
