//! Feed source
//!
//! Fetches the configured feeds and renders one attachment per feed with the
//! items that are recent enough and whose titles match the configured rule.

use super::Source;
use crate::clock::SharedClock;
use crate::config::{block_enabled, IntegrationsConfig, RssSourceConfig};
use crate::domain::{
    humanize, parse_duration, Attachment, AttachmentField, Feed, MatchRule, Message,
    MessageOptions,
};
use crate::error::{FetchError, NotLoadedError, RenderError, ValidationError};
use crate::feed::{parse_feed, FeedFetcher};

use chrono::{DateTime, Utc};

const NAME: &str = "RSS";

/// One fetched feed with its eligibility window
#[derive(Debug, Clone)]
struct LoadedFeed {
    url: String,
    feed: Feed,
    since: DateTime<Utc>,
    rule: MatchRule,
}

/// Feed digest source
pub struct RssSource<F: FeedFetcher> {
    fetcher: F,
    clock: SharedClock,
    /// Lookback reference, taken once when the source is created
    reference: DateTime<Utc>,
    feeds: Option<Vec<LoadedFeed>>,
}

impl<F: FeedFetcher> RssSource<F> {
    pub fn new(fetcher: F, clock: SharedClock) -> Self {
        let reference = clock.now();
        Self {
            fetcher,
            clock,
            reference,
            feeds: None,
        }
    }

    fn load_one(&self, source: &RssSourceConfig) -> Result<LoadedFeed, FetchError> {
        let lookback =
            parse_duration(&source.since).map_err(|e| FetchError::InvalidLookback {
                url: source.url.clone(),
                value: source.since.clone(),
                message: e.to_string(),
            })?;

        let rule = MatchRule::compile(&source.match_title).map_err(|(pattern, e)| {
            FetchError::InvalidPattern {
                url: source.url.clone(),
                pattern,
                source: e,
            }
        })?;
        if rule.is_empty() {
            log::warn!("Feed {} has no matchTitle rules, no item will match", source.url);
        }

        let body = self.fetcher.fetch(&source.url)?;
        let feed = parse_feed(&body).map_err(|e| FetchError::Parse {
            url: source.url.clone(),
            message: e.to_string(),
        })?;

        log::info!("{} item(s) found in feed {}", feed.items.len(), source.url);

        Ok(LoadedFeed {
            url: source.url.clone(),
            feed,
            since: self.reference - lookback,
            rule,
        })
    }
}

fn item_field(title: &str, link: &str, age: String) -> AttachmentField {
    AttachmentField::line(format!("• <{}|{}> ({} ago)", link, title, age))
}

impl<F: FeedFetcher> Source for RssSource<F> {
    fn name(&self) -> &str {
        NAME
    }

    fn enabled(&self, config: &IntegrationsConfig) -> bool {
        config
            .rss
            .as_ref()
            .is_some_and(|r| block_enabled(r.enabled.as_ref()))
    }

    fn validate(&self, config: &IntegrationsConfig) -> Result<(), ValidationError> {
        let rss = config
            .rss
            .as_ref()
            .ok_or_else(|| ValidationError::missing(NAME, "integrations.rss"))?;

        if rss.sources.is_empty() {
            return Err(ValidationError::missing(NAME, "sources"));
        }
        if let Some(i) = rss.sources.iter().position(|s| s.url.trim().is_empty()) {
            return Err(ValidationError::missing(NAME, &format!("sources[{}].url", i)));
        }

        Ok(())
    }

    fn load(&mut self, config: &IntegrationsConfig) -> Result<(), FetchError> {
        self.feeds = None;

        let sources = config.rss.as_ref().map(|r| r.sources.as_slice()).unwrap_or_default();
        let feeds = sources
            .iter()
            .map(|s| self.load_one(s))
            .collect::<Result<Vec<_>, _>>()?;

        self.feeds = Some(feeds);
        Ok(())
    }

    fn generate_message(&self, options: &MessageOptions) -> Result<Message, RenderError> {
        let feeds = self.feeds.as_ref().ok_or_else(|| NotLoadedError::new(NAME))?;
        let now = self.clock.now();

        let attachments = feeds
            .iter()
            .filter_map(|loaded| {
                let fields: Vec<AttachmentField> = loaded
                    .feed
                    .eligible_items(loaded.since, &loaded.rule)
                    .map(|item| {
                        let age = item.published.map(|p| humanize(now - p)).unwrap_or_default();
                        item_field(&item.title, &item.link, age)
                    })
                    .collect();

                if fields.is_empty() {
                    log::debug!("No matching items in feed {}", loaded.url);
                    return None;
                }

                Some(Attachment {
                    color: options.color.clone(),
                    author_name: loaded.feed.title.clone(),
                    author_link: loaded.feed.link.clone(),
                    fields,
                    ts: now.timestamp(),
                    ..Default::default()
                })
            })
            .collect();

        Ok(Message::with_attachments(attachments))
    }
}
