//! Slack incoming-webhook alerter

use super::Alerter;
use crate::config::{block_enabled, AlertConfig, SlackConfig};
use crate::domain::Message;
use crate::error::{DeliveryError, NotLoadedError, ValidationError};

use reqwest::blocking::Client;

const NAME: &str = "Slack";

/// Posts a JSON payload to a webhook URL
pub trait WebhookTransport {
    fn post(&self, url: &str, message: &Message) -> Result<(), DeliveryError>;
}

/// Transport backed by the shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpWebhookTransport {
    client: Client,
}

impl HttpWebhookTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl WebhookTransport for HttpWebhookTransport {
    fn post(&self, url: &str, message: &Message) -> Result<(), DeliveryError> {
        let response = self.client.post(url).json(message).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Logs the payload instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunTransport;

impl WebhookTransport for DryRunTransport {
    fn post(&self, _url: &str, message: &Message) -> Result<(), DeliveryError> {
        let payload = serde_json::to_string_pretty(message)?;
        log::info!("Dry run, payload not sent:\n{}", payload);
        Ok(())
    }
}

/// Overwrite the delivery settings on a copy of the message
fn decorate(message: &Message, config: &SlackConfig) -> Message {
    let mut out = message.clone();
    out.channel = config.channel.clone();
    out.username = config.username.clone();
    out.icon_emoji.clear();
    out.icon_url.clear();

    let icon = config.icon.trim();
    if icon.starts_with("http://") || icon.starts_with("https://") {
        out.icon_url = icon.to_string();
    } else {
        out.icon_emoji = icon.to_string();
    }
    out
}

/// Slack alerter
pub struct SlackAlerter<T: WebhookTransport> {
    transport: T,
    config: Option<SlackConfig>,
}

impl<T: WebhookTransport> SlackAlerter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: None,
        }
    }
}

impl<T: WebhookTransport> Alerter for SlackAlerter<T> {
    fn name(&self) -> &str {
        NAME
    }

    fn enabled(&self, config: &AlertConfig) -> bool {
        config
            .slack
            .as_ref()
            .is_some_and(|s| block_enabled(s.enabled.as_ref()))
    }

    fn load(&mut self, config: &AlertConfig) -> Result<(), ValidationError> {
        self.config = None;

        let slack = config
            .slack
            .as_ref()
            .ok_or_else(|| ValidationError::missing(NAME, "alert.slack"))?;

        let webhook = slack.webhook.trim();
        if webhook.is_empty() {
            return Err(ValidationError::missing(NAME, "webhook"));
        }
        if !(webhook.starts_with("http://") || webhook.starts_with("https://")) {
            return Err(ValidationError::invalid(
                NAME,
                "webhook",
                "expected an http(s) URL",
            ));
        }
        if slack.channel.trim().is_empty() {
            log::debug!("{}: no channel set, the webhook default is used", NAME);
        }

        self.config = Some(slack.clone());
        Ok(())
    }

    fn channel(&self) -> &str {
        self.config.as_ref().map(|c| c.channel.as_str()).unwrap_or_default()
    }

    fn alert(&self, message: &Message) -> Result<(), DeliveryError> {
        let config = self.config.as_ref().ok_or_else(|| NotLoadedError::new(NAME))?;
        let payload = decorate(message, config);
        self.transport.post(config.webhook.trim(), &payload)
    }
}
