//! Feed document retrieval
//!
//! Feeds are addressed by `http(s)://` URL, `file://` URL or local path.

use crate::error::FetchError;
use crate::http::summarize_body;

use reqwest::blocking::Client;

/// Retrieves the raw feed document for a URL
pub trait FeedFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetcher backed by the shared HTTP client, with local file support
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn fetch_remote(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().map_err(|source| FetchError::Http {
            endpoint: url.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().map_err(|source| FetchError::Http {
            endpoint: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
                message: summarize_body(&body),
            });
        }

        Ok(body)
    }
}

/// Local path for `file://` URLs and bare paths, `None` for remote URLs
pub fn local_path(url: &str) -> Option<&str> {
    if let Some(path) = url.strip_prefix("file://") {
        return Some(path);
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return None;
    }
    Some(url)
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match local_path(url) {
            Some(path) => std::fs::read_to_string(path).map_err(|source| FetchError::Read {
                path: path.to_string(),
                source,
            }),
            None => self.fetch_remote(url),
        }
    }
}
