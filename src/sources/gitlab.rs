//! Merge request source
//!
//! Scans the configured groups for open merge requests and renders one
//! attachment per project that has any.

use super::Source;
use crate::clock::SharedClock;
use crate::config::{block_enabled, GitLabConfig, IntegrationsConfig};
use crate::domain::review::STATE_OPENED;
use crate::domain::{
    humanize_emphasized, Attachment, GroupScan, MergeRequest, Message, MessageOptions,
    ProjectScan,
};
use crate::error::{FetchError, NotLoadedError, RenderError, ValidationError};
use crate::gitlab::{GitLabApi, GitLabConnector};

use chrono::{DateTime, Utc};
use std::fmt::Write;

const NAME: &str = "GitLab";

/// Fetched state kept between `load` and `generate_message`
#[derive(Debug, Clone, Default)]
struct ScanResult {
    base_url: String,
    groups: Vec<GroupScan>,
}

/// Open merge request reminder source
pub struct GitLabSource<C: GitLabConnector> {
    connector: C,
    clock: SharedClock,
    result: Option<ScanResult>,
}

impl<C: GitLabConnector> GitLabSource<C> {
    pub fn new(connector: C, clock: SharedClock) -> Self {
        Self {
            connector,
            clock,
            result: None,
        }
    }

    fn scan(api: &C::Api, config: &GitLabConfig) -> Result<Vec<GroupScan>, FetchError> {
        let mut groups = Vec::with_capacity(config.listen.groups.len());

        for &group_id in &config.listen.groups {
            let projects = api.group_projects(group_id).map_err(|e| {
                e.context(format!("Unable to list projects for group id: '{}'", group_id))
            })?;

            log::info!("{} project(s) found in group {}", projects.items.len(), group_id);
            if let Some(next) = projects.next_page {
                log::warn!(
                    "Group {} has more projects (page {}) that are not scanned",
                    group_id,
                    next
                );
            }

            let mut scans = Vec::with_capacity(projects.items.len());
            for project in projects.items {
                let mrs = api
                    .project_merge_requests(project.id, STATE_OPENED)
                    .map_err(|e| {
                        e.context(format!(
                            "Unable to list merge requests for project id: {}, group id: {}",
                            project.id, group_id
                        ))
                    })?;

                log::info!("{} MR(s) found in project {}", mrs.items.len(), project.name);
                if let Some(next) = mrs.next_page {
                    log::warn!(
                        "Project {} has more merge requests (page {}) that are not scanned",
                        project.name,
                        next
                    );
                }

                scans.push(ProjectScan {
                    project,
                    merge_requests: mrs.items,
                });
            }

            groups.push(GroupScan {
                group_id,
                projects: scans,
            });
        }

        Ok(groups)
    }
}

fn date_info(mr: &MergeRequest, now: DateTime<Utc>) -> Option<String> {
    let created = mr.created_at?;
    let created_ago = humanize_emphasized(now - created);

    Some(match mr.updated_at {
        Some(updated) if updated != created => format!(
            "(created {} ago, updated {} ago)",
            created_ago,
            humanize_emphasized(now - updated)
        ),
        _ => format!("(created {} ago)", created_ago),
    })
}

fn mr_line(mr: &MergeRequest, now: DateTime<Utc>) -> String {
    let mut line = format!("{} <{}|{}>", mr.merge_glyph(), mr.web_url, mr.title);
    if let Some(info) = date_info(mr, now) {
        line.push(' ');
        line.push_str(&info);
    }
    line.push_str(&format!(" by <@{}>", mr.author.username));
    line
}

fn footer_icon(base_url: &str, avatar: Option<&str>) -> String {
    match avatar {
        None | Some("") => String::new(),
        Some(a) if a.starts_with("http://") || a.starts_with("https://") => a.to_string(),
        Some(a) => format!("{}{}", base_url.trim_end_matches('/'), a),
    }
}

/// Render the reminder text for one project, `None` when nothing is open
pub fn project_text(scan: &ProjectScan, now: DateTime<Utc>) -> Option<String> {
    let open = scan.open_merge_requests();
    let count = open.len();
    if count == 0 {
        return None;
    }

    let project = &scan.project;
    let list_link = format!("{}/merge_requests?state=opened", project.web_url);
    let keyword = if count > 1 {
        format!("are <{}|{} open MRs>", list_link, count)
    } else {
        format!("is <{}|{} open MR>", list_link, count)
    };

    let mut text = String::new();
    let _ = write!(
        text,
        "There {} in <{}|{}>.",
        keyword, project.web_url, project.name_with_namespace
    );

    if count > 1 {
        if let Some(oldest) = open.oldest {
            let _ = write!(text, " The oldest one is {} old.", humanize_emphasized(now - oldest));
        }
    }
    text.push('\n');

    match open.reviewed.len() {
        0 => {}
        1 => text.push_str("\n1 MR is reviewed and waiting:"),
        n => {
            let _ = write!(text, "\n{} MRs are reviewed and waiting:", n);
        }
    }
    for mr in &open.reviewed {
        text.push('\n');
        text.push_str(&mr_line(mr, now));
    }
    if !open.reviewed.is_empty() {
        text.push('\n');
    }

    match open.awaiting.len() {
        0 => {}
        1 => text.push_str("\n1 MR is awaiting review:"),
        n => {
            let _ = write!(text, "\n{} MRs are awaiting review:", n);
        }
    }
    for mr in &open.awaiting {
        text.push('\n');
        text.push_str(&mr_line(mr, now));
    }

    Some(text)
}

impl<C: GitLabConnector> Source for GitLabSource<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn enabled(&self, config: &IntegrationsConfig) -> bool {
        config
            .gitlab
            .as_ref()
            .is_some_and(|g| block_enabled(g.enabled.as_ref()))
    }

    fn validate(&self, config: &IntegrationsConfig) -> Result<(), ValidationError> {
        let gitlab = config
            .gitlab
            .as_ref()
            .ok_or_else(|| ValidationError::missing(NAME, "integrations.gitlab"))?;

        if gitlab.token.trim().is_empty() {
            return Err(ValidationError::missing(NAME, "token"));
        }
        if gitlab.base_url.trim().is_empty() {
            return Err(ValidationError::missing(NAME, "baseURL"));
        }
        if gitlab.listen.groups.is_empty() {
            log::warn!("{}: no groups configured under listen.groups", NAME);
        }

        Ok(())
    }

    fn load(&mut self, config: &IntegrationsConfig) -> Result<(), FetchError> {
        self.result = None;

        let gitlab = config
            .gitlab
            .as_ref()
            .ok_or_else(|| FetchError::Client("GitLab integration is not configured".to_string()))?;

        let api = self
            .connector
            .connect(gitlab)
            .map_err(|e| e.context("Unable to generate GitLab client"))?;
        let groups = Self::scan(&api, gitlab)?;
        for group in &groups {
            log::debug!(
                "Group {} scanned: {} project(s)",
                group.group_id,
                group.projects.len()
            );
        }

        self.result = Some(ScanResult {
            base_url: gitlab.base_url.clone(),
            groups,
        });
        Ok(())
    }

    fn generate_message(&self, options: &MessageOptions) -> Result<Message, RenderError> {
        let result = self.result.as_ref().ok_or_else(|| NotLoadedError::new(NAME))?;
        let now = self.clock.now();

        let attachments = result
            .groups
            .iter()
            .flat_map(|g| g.projects.iter())
            .filter_map(|scan| {
                let text = project_text(scan, now)?;
                let project = &scan.project;
                Some(Attachment {
                    color: options.color.clone(),
                    author_name: project.name.clone(),
                    author_link: project.http_url_to_repo.clone(),
                    author_icon: project.avatar_url.clone().unwrap_or_default(),
                    text,
                    fields: Vec::new(),
                    footer: project.namespace.full_path.clone(),
                    footer_icon: footer_icon(
                        &result.base_url,
                        project.namespace.avatar_url.as_deref(),
                    ),
                    ts: now.timestamp(),
                })
            })
            .collect();

        Ok(Message::with_attachments(attachments))
    }
}
