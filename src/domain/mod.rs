//! Domain models for remind-us
//!
//! Data flowing through the pipeline: review-platform entities, feeds,
//! title filters and the rendered chat message.

pub mod duration;
pub mod feed;
pub mod message;
pub mod review;

pub use duration::{humanize, humanize_emphasized, parse_duration, DurationParseError};
pub use feed::{Feed, FeedItem, MatchRule};
pub use message::{Attachment, AttachmentField, Message, MessageOptions, DEFAULT_COLOR};
pub use review::{
    Author, GroupScan, MergeRequest, Namespace, OpenMergeRequests, Project, ProjectScan,
    ReviewState,
};
