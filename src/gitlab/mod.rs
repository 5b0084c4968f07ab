//! Review platform abstraction layer
//!
//! Provides trait-based abstractions over the GitLab API for testability.

pub mod client;
pub mod traits;

pub use client::{GitLabClient, HttpConnector};
pub use traits::{GitLabApi, GitLabConnector, Page, PER_PAGE};
