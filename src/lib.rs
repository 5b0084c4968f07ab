//! remind-us - batch chat reminders
//!
//! This library scans a code review platform for open merge requests and
//! syndication feeds for recent matching items, and renders the results as
//! chat webhook messages.
//!
//! # Modules
//!
//! - [`alerters`]: Message delivery
//! - [`cli`]: Command-line interface definitions
//! - [`clock`]: Time source
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models and rendering helpers
//! - [`error`]: Error types
//! - [`feed`]: Feed fetching and parsing
//! - [`gitlab`]: GitLab API abstraction layer
//! - [`http`]: Shared HTTP client setup
//! - [`runner`]: Run orchestration
//! - [`sources`]: Data sources

pub mod alerters;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod gitlab;
pub mod http;
pub mod runner;
pub mod sources;

#[cfg(test)]
pub mod mock;

pub use error::{AppError, Result};
