//! Review platform domain types
//!
//! Projects and merge requests as returned by the review platform's API,
//! plus the open/reviewed/awaiting classification used for reminders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State value of an open merge request
pub const STATE_OPENED: &str = "opened";

/// Merge status value meaning the MR merges cleanly
pub const STATUS_CAN_BE_MERGED: &str = "can_be_merged";

/// Glyph for a mergeable MR
pub const GLYPH_MERGEABLE: char = '✓';

/// Glyph for any other merge status
pub const GLYPH_BLOCKED: char = '✘';

/// Namespace (group path) a project lives in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(default)]
    pub full_path: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Project from a group listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub name_with_namespace: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub http_url_to_repo: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub namespace: Namespace,
}

/// Merge request author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
}

/// Merge request from a project listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    #[serde(default)]
    pub iid: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default)]
    pub user_notes_count: u32,
    #[serde(default)]
    pub merge_status: String,
    #[serde(default)]
    pub author: Author,
}

/// Review activity of an open merge request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Has at least one vote or comment
    Reviewed,
    /// No votes and no comments yet
    Awaiting,
}

impl MergeRequest {
    pub fn is_open(&self) -> bool {
        self.state.eq_ignore_ascii_case(STATE_OPENED)
    }

    pub fn review_state(&self) -> ReviewState {
        if self.upvotes > 0 || self.downvotes > 0 || self.user_notes_count > 0 {
            ReviewState::Reviewed
        } else {
            ReviewState::Awaiting
        }
    }

    pub fn can_be_merged(&self) -> bool {
        self.merge_status.eq_ignore_ascii_case(STATUS_CAN_BE_MERGED)
    }

    pub fn merge_glyph(&self) -> char {
        if self.can_be_merged() {
            GLYPH_MERGEABLE
        } else {
            GLYPH_BLOCKED
        }
    }
}

/// A project with the merge requests fetched for it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectScan {
    pub project: Project,
    pub merge_requests: Vec<MergeRequest>,
}

/// Open merge requests of one project, split by review state.
///
/// Both lists keep the listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenMergeRequests<'a> {
    pub reviewed: Vec<&'a MergeRequest>,
    pub awaiting: Vec<&'a MergeRequest>,
    /// Earliest creation time; first seen wins ties
    pub oldest: Option<DateTime<Utc>>,
}

impl<'a> OpenMergeRequests<'a> {
    pub fn len(&self) -> usize {
        self.reviewed.len() + self.awaiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectScan {
    /// Classify the open merge requests
    pub fn open_merge_requests(&self) -> OpenMergeRequests<'_> {
        let mut open = OpenMergeRequests::default();

        for mr in self.merge_requests.iter().filter(|m| m.is_open()) {
            if let Some(created) = mr.created_at {
                if open.oldest.map_or(true, |oldest| created < oldest) {
                    open.oldest = Some(created);
                }
            }

            match mr.review_state() {
                ReviewState::Reviewed => open.reviewed.push(mr),
                ReviewState::Awaiting => open.awaiting.push(mr),
            }
        }

        open
    }
}

/// All projects scanned for one group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupScan {
    pub group_id: u64,
    pub projects: Vec<ProjectScan>,
}
