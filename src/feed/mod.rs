//! Feed access layer
//!
//! Fetching and parsing of syndication feeds.

pub mod fetcher;
pub mod parser;

pub use fetcher::{FeedFetcher, HttpFeedFetcher};
pub use parser::{parse_date, parse_feed, FeedParseError};
