//! RSS and Atom parsing
//!
//! Handles RSS 2.0, RSS 1.0 (RDF) and Atom documents with a streaming
//! reader. Only the fields needed for digests are extracted.

use crate::domain::{Feed, FeedItem};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Errors from [`parse_feed`]
#[derive(Error, Debug)]
pub enum FeedParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unsupported document root '{0}'")]
    UnsupportedRoot(String),

    #[error("document has no root element")]
    Empty,
}

const ROOTS: [&str; 3] = ["rss", "feed", "RDF"];

#[derive(Default)]
struct ItemBuilder {
    title: String,
    link: String,
    published: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
}

impl ItemBuilder {
    fn build(self) -> FeedItem {
        FeedItem {
            title: self.title,
            link: self.link,
            published: self.published.or(self.updated),
        }
    }
}

/// Zoned layouts seen in feeds besides RFC 3339 and RFC 2822
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Layouts without a zone, read as UTC
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a feed timestamp.
///
/// Accepts RFC 3339, RFC 2822, W3C date-time variants with or without a
/// zone, and date-only values (midnight UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
    {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(value, f).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(naive, f).ok())
    {
        return Some(dt.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn scrub_html_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "–")
        .replace("&mdash;", "—")
        .replace("&ldquo;", "\u{201c}")
        .replace("&rdquo;", "\u{201d}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&rsquo;", "\u{2019}")
        .replace("&hellip;", "…")
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// `href` of an Atom link that points at the page itself
fn alternate_href(e: &BytesStart<'_>) -> Option<String> {
    let mut href = None;
    let mut rel = None;

    for attr in e.attributes().flatten() {
        let value = attr
            .unescape_value_with(resolve_html5_entity)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        match attr.key.local_name().as_ref() {
            b"href" => href = Some(value),
            b"rel" => rel = Some(value),
            _ => {}
        }
    }

    match rel.as_deref() {
        None | Some("alternate") => href.filter(|h| !h.trim().is_empty()),
        _ => None,
    }
}

fn is_item(name: &str) -> bool {
    name == "item" || name == "entry"
}

fn is_channel(name: &str) -> bool {
    name == "channel" || name == "feed"
}

#[derive(Default)]
struct FeedBuilder {
    stack: Vec<String>,
    feed: Feed,
    item: Option<ItemBuilder>,
    text: String,
}

impl FeedBuilder {
    fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    fn link_attribute(&mut self, e: &BytesStart<'_>) {
        let Some(href) = alternate_href(e) else {
            return;
        };

        if let Some(item) = self.item.as_mut() {
            if item.link.is_empty() {
                item.link = href;
            }
        } else if self.parent().is_some_and(is_channel) && self.feed.link.is_empty() {
            self.feed.link = href;
        }
    }

    fn start(&mut self, e: &BytesStart<'_>) -> Result<(), FeedParseError> {
        let name = local_name(e);

        if self.stack.is_empty() && !ROOTS.contains(&name.as_str()) {
            return Err(FeedParseError::UnsupportedRoot(name));
        }
        if name == "link" {
            self.link_attribute(e);
        }
        if is_item(&name) {
            self.item = Some(ItemBuilder::default());
        }

        self.stack.push(name);
        self.text.clear();
        Ok(())
    }

    fn end(&mut self) {
        let Some(name) = self.stack.pop() else {
            return;
        };
        let value = std::mem::take(&mut self.text).trim().to_string();

        if is_item(&name) {
            if let Some(item) = self.item.take() {
                self.feed.items.push(item.build());
            }
            return;
        }

        if self.parent().is_some_and(is_item) {
            let Some(item) = self.item.as_mut() else {
                return;
            };
            match name.as_str() {
                "title" => item.title = value,
                "link" if item.link.is_empty() && !value.is_empty() => item.link = value,
                "pubDate" | "published" | "issued" => item.published = parse_date(&value),
                "updated" | "date" | "modified" => {
                    if item.updated.is_none() {
                        item.updated = parse_date(&value);
                    }
                }
                _ => {}
            }
        } else if self.item.is_none() && self.parent().is_some_and(is_channel) {
            match name.as_str() {
                "title" if self.feed.title.is_empty() => self.feed.title = value,
                "link" if self.feed.link.is_empty() && !value.is_empty() => self.feed.link = value,
                _ => {}
            }
        }
    }
}

/// Parse an RSS or Atom document
pub fn parse_feed(xml: &str) -> Result<Feed, FeedParseError> {
    let scrubbed = scrub_html_entities(xml);
    let mut reader = Reader::from_str(&scrubbed);
    let mut builder = FeedBuilder::default();
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                builder.start(&e)?;
                saw_root = true;
            }
            Event::Empty(e) => {
                if !saw_root {
                    return Err(FeedParseError::UnsupportedRoot(local_name(&e)));
                }
                if e.local_name().as_ref() == b"link" {
                    builder.link_attribute(&e);
                }
            }
            Event::End(_) => builder.end(),
            Event::Text(t) => {
                let text = t
                    .unescape_with(resolve_html5_entity)
                    .map(|c| c.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                builder.text.push_str(&text);
            }
            Event::CData(c) => builder.text.push_str(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(FeedParseError::Empty);
    }

    Ok(builder.feed)
}
