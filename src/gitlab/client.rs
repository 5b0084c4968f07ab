//! Review platform HTTP client
//!
//! Blocking client for the GitLab API v4 with token authentication.

use super::traits::{GitLabApi, GitLabConnector, Page, PER_PAGE};
use crate::config::GitLabConfig;
use crate::domain::{MergeRequest, Project};
use crate::error::FetchError;
use crate::http::{build_client, summarize_body};

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authenticated API client
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    base_url: String,
}

impl GitLabClient {
    /// Create a new client
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let token_value = HeaderValue::from_str(token)
            .map_err(|_| FetchError::Client("Invalid token format".to_string()))?;
        headers.insert("PRIVATE-TOKEN", token_value);

        let client = build_client(timeout, headers)
            .map_err(|e| FetchError::Client(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FetchError::Client(format!(
                "Base URL must start with http:// or https://: '{}'",
                base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    /// Parse the next page header; empty means last page
    fn next_page(headers: &HeaderMap) -> Option<u32> {
        headers
            .get("x-next-page")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
    }

    /// GET the first page of a listing
    fn get_first_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Page<T>, FetchError> {
        let per_page = PER_PAGE.to_string();

        let response = self
            .client
            .get(self.api_url(endpoint))
            .query(query)
            .query(&[("page", "1"), ("per_page", per_page.as_str())])
            .send()
            .map_err(|source| FetchError::Http {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: summarize_body(&body),
            });
        }

        let next_page = Self::next_page(response.headers());
        let items = response.json::<Vec<T>>().map_err(|e| FetchError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        Ok(Page { items, next_page })
    }
}

impl GitLabApi for GitLabClient {
    fn group_projects(&self, group_id: u64) -> Result<Page<Project>, FetchError> {
        self.get_first_page(&format!("/groups/{}/projects", group_id), &[])
    }

    fn project_merge_requests(
        &self,
        project_id: u64,
        state: &str,
    ) -> Result<Page<MergeRequest>, FetchError> {
        self.get_first_page(
            &format!("/projects/{}/merge_requests", project_id),
            &[("state", state)],
        )
    }
}

/// Connector producing [`GitLabClient`]s
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl GitLabConnector for HttpConnector {
    type Api = GitLabClient;

    fn connect(&self, config: &GitLabConfig) -> Result<GitLabClient, FetchError> {
        GitLabClient::new(&config.base_url, &config.token, self.timeout)
    }
}
