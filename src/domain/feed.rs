//! Feed domain types
//!
//! Parsed syndication feeds and the title filter applied to their items.

use crate::config::MatchTitleConfig;
use chrono::{DateTime, Utc};
use regex::Regex;

/// A parsed feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    /// Display title, used as attachment author
    pub title: String,
    /// Site link, used as attachment author link
    pub link: String,
    /// Items in document order
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

impl FeedItem {
    /// Published at or after `since`; undated items never qualify
    pub fn is_within(&self, since: DateTime<Utc>) -> bool {
        self.published.is_some_and(|p| p >= since)
    }
}

/// Title filter.
///
/// A title matches if any regex matches it or it contains any of the
/// substrings. A rule with neither matches nothing.
#[derive(Debug, Clone, Default)]
pub struct MatchRule {
    patterns: Vec<Regex>,
    substrings: Vec<String>,
}

impl MatchRule {
    pub fn new(patterns: Vec<Regex>, substrings: Vec<String>) -> Self {
        Self {
            patterns,
            substrings,
        }
    }

    /// Compile the configured patterns, reporting the first one that fails
    pub fn compile(config: &MatchTitleConfig) -> Result<Self, (String, regex::Error)> {
        let patterns = config
            .regex
            .iter()
            .map(|p| Regex::new(p).map_err(|e| (p.clone(), e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(patterns, config.contains.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.substrings.is_empty()
    }

    pub fn matches(&self, title: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(title))
            || self.substrings.iter().any(|s| title.contains(s.as_str()))
    }
}

impl Feed {
    /// Items inside the window whose title matches, in feed order
    pub fn eligible_items<'a>(
        &'a self,
        since: DateTime<Utc>,
        rule: &'a MatchRule,
    ) -> impl Iterator<Item = &'a FeedItem> + 'a {
        self.items
            .iter()
            .filter(move |item| item.is_within(since) && rule.matches(&item.title))
    }
}
