//! Message delivery
//!
//! An alerter takes a rendered message and delivers it to a chat channel.

pub mod slack;

pub use slack::{DryRunTransport, HttpWebhookTransport, SlackAlerter, WebhookTransport};

use crate::config::AlertConfig;
use crate::domain::Message;
use crate::error::{DeliveryError, ValidationError};

use reqwest::blocking::Client;

/// Delivery channel trait
pub trait Alerter {
    /// Name used in logs and error context
    fn name(&self) -> &str;

    /// Whether the alerter's config block is present and switched on
    fn enabled(&self, config: &AlertConfig) -> bool;

    /// Capture and check the alerter's config
    fn load(&mut self, config: &AlertConfig) -> Result<(), ValidationError>;

    /// Destination reported after a successful delivery
    fn channel(&self) -> &str;

    /// Deliver one message; fails before a successful `load`
    fn alert(&self, message: &Message) -> Result<(), DeliveryError>;
}

/// Production alerters in run order
pub fn default_alerters(client: Client, dry_run: bool) -> Vec<Box<dyn Alerter>> {
    if dry_run {
        vec![Box::new(SlackAlerter::new(DryRunTransport))]
    } else {
        vec![Box::new(SlackAlerter::new(HttpWebhookTransport::new(client)))]
    }
}
