//! Trait definitions for review platform access
//!
//! These traits abstract over the HTTP API to enable testing with mocks.

use crate::config::GitLabConfig;
use crate::domain::{MergeRequest, Project};
use crate::error::FetchError;

/// Items requested per listing call
pub const PER_PAGE: u32 = 100;

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Next page number advertised by the server, if any
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// A page with nothing after it
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }
}

/// Listing operations used by the merge request scanner.
///
/// Each call returns only the first page of up to [`PER_PAGE`] items.
pub trait GitLabApi {
    /// List projects of a group
    fn group_projects(&self, group_id: u64) -> Result<Page<Project>, FetchError>;

    /// List merge requests of a project, filtered server-side by state
    fn project_merge_requests(
        &self,
        project_id: u64,
        state: &str,
    ) -> Result<Page<MergeRequest>, FetchError>;
}

/// Builds an API client from the configured credentials
pub trait GitLabConnector {
    /// The client type returned by this connector
    type Api: GitLabApi;

    fn connect(&self, config: &GitLabConfig) -> Result<Self::Api, FetchError>;
}
