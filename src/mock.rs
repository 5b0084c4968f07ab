//! Mock implementations for testing
//!
//! Provides in-memory GitLab, feed and webhook backends, plus scripted
//! sources and alerters for exercising the runner without a network.

use crate::alerters::{Alerter, WebhookTransport};
use crate::config::{AlertConfig, GitLabConfig, IntegrationsConfig};
use crate::domain::{Attachment, MergeRequest, Message, MessageOptions, Project};
use crate::error::{DeliveryError, FetchError, NotLoadedError, RenderError, ValidationError};
use crate::gitlab::{GitLabApi, GitLabConnector, Page};
use crate::sources::Source;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Group id served by [`MockGitLab::fixture`]
pub const FIXTURE_GROUP: u64 = 7;

/// In-memory GitLab API
///
/// Clones share the record of requested merge request states.
#[derive(Debug, Clone, Default)]
pub struct MockGitLab {
    projects: HashMap<u64, Vec<Project>>,
    merge_requests: HashMap<u64, Vec<MergeRequest>>,
    failing_groups: HashSet<u64>,
    next_pages: HashMap<u64, u32>,
    states: Arc<Mutex<Vec<String>>>,
}

impl MockGitLab {
    /// Group 7 with the two recorded projects and their merge requests
    pub fn fixture() -> Self {
        let projects: Vec<Project> =
            serde_json::from_str(include_str!("../testdata/gitlab/group_projects.json")).unwrap();
        let mrs_1162: Vec<MergeRequest> = serde_json::from_str(include_str!(
            "../testdata/gitlab/project_1162_merge_requests.json"
        ))
        .unwrap();
        let mrs_1163: Vec<MergeRequest> = serde_json::from_str(include_str!(
            "../testdata/gitlab/project_1163_merge_requests.json"
        ))
        .unwrap();

        Self::default()
            .with_group(FIXTURE_GROUP, projects)
            .with_merge_requests(1162, mrs_1162)
            .with_merge_requests(1163, mrs_1163)
    }

    /// Builder: set the projects of a group
    pub fn with_group(mut self, group_id: u64, projects: Vec<Project>) -> Self {
        self.projects.insert(group_id, projects);
        self
    }

    /// Builder: set the merge requests of a project
    pub fn with_merge_requests(mut self, project_id: u64, mrs: Vec<MergeRequest>) -> Self {
        self.merge_requests.insert(project_id, mrs);
        self
    }

    /// Builder: listing this group answers 404
    pub fn failing_group(mut self, group_id: u64) -> Self {
        self.failing_groups.insert(group_id);
        self
    }

    /// Builder: advertise a further page for this group's project listing
    pub fn with_next_page(mut self, group_id: u64, page: u32) -> Self {
        self.next_pages.insert(group_id, page);
        self
    }

    /// State filters seen by `project_merge_requests`, in call order
    pub fn requested_states(&self) -> Vec<String> {
        self.states.lock().unwrap().clone()
    }
}

impl GitLabApi for MockGitLab {
    fn group_projects(&self, group_id: u64) -> Result<Page<Project>, FetchError> {
        if self.failing_groups.contains(&group_id) {
            return Err(FetchError::Status {
                endpoint: format!("/groups/{}/projects", group_id),
                status: 404,
                message: "404 Group Not Found".to_string(),
            });
        }

        Ok(Page {
            items: self.projects.get(&group_id).cloned().unwrap_or_default(),
            next_page: self.next_pages.get(&group_id).copied(),
        })
    }

    fn project_merge_requests(
        &self,
        project_id: u64,
        state: &str,
    ) -> Result<Page<MergeRequest>, FetchError> {
        self.states.lock().unwrap().push(state.to_string());

        // server-side filter
        let items = self
            .merge_requests
            .get(&project_id)
            .map(|mrs| {
                mrs.iter()
                    .filter(|mr| mr.state.eq_ignore_ascii_case(state))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Page::last(items))
    }
}

/// Hands out a [`MockGitLab`], or refuses like an invalid base URL would
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    api: Option<MockGitLab>,
}

impl MockConnector {
    pub fn new(api: MockGitLab) -> Self {
        Self { api: Some(api) }
    }

    pub fn refusing() -> Self {
        Self { api: None }
    }
}

impl GitLabConnector for MockConnector {
    type Api = MockGitLab;

    fn connect(&self, config: &GitLabConfig) -> Result<Self::Api, FetchError> {
        self.api
            .clone()
            .ok_or_else(|| FetchError::Client(format!("invalid base URL '{}'", config.base_url)))
    }
}

/// Feed bodies keyed by URL
#[derive(Debug, Clone, Default)]
pub struct MockFeedFetcher {
    feeds: HashMap<String, String>,
}

impl MockFeedFetcher {
    pub fn with_feed(mut self, url: &str, body: &str) -> Self {
        self.feeds.insert(url.to_string(), body.to_string());
        self
    }
}

impl crate::feed::FeedFetcher for MockFeedFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.feeds.get(url).cloned().ok_or_else(|| FetchError::Status {
            endpoint: url.to_string(),
            status: 404,
            message: "Not Found".to_string(),
        })
    }
}

/// Records posted payloads; optionally answers with an error status
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<(String, Message)>>>,
    failure: Option<(u16, String)>,
}

impl RecordingTransport {
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            failure: Some((status, body.to_string())),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, Message)> {
        self.sent.lock().unwrap().clone()
    }
}

impl WebhookTransport for RecordingTransport {
    fn post(&self, url: &str, message: &Message) -> Result<(), DeliveryError> {
        if let Some((status, body)) = &self.failure {
            return Err(DeliveryError::Status {
                status: *status,
                body: body.clone(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((url.to_string(), message.clone()));
        Ok(())
    }
}

/// Pipeline step a scripted component fails at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Validate,
    Load,
    Render,
    AlerterLoad,
    Alert,
}

/// Shared journal of component calls, e.g. `"GitLab:load"`
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Source with canned behavior
pub struct ScriptedSource {
    name: String,
    enabled: bool,
    attachments: usize,
    fail_at: Option<FailAt>,
    loaded: bool,
    calls: CallLog,
}

impl ScriptedSource {
    pub fn new(name: &str, attachments: usize, calls: CallLog) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            attachments,
            fail_at: None,
            loaded: false,
            calls,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    fn record(&self, step: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, step));
    }
}

impl Source for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, _config: &IntegrationsConfig) -> bool {
        self.enabled
    }

    fn validate(&self, _config: &IntegrationsConfig) -> Result<(), ValidationError> {
        self.record("validate");
        if self.fail_at == Some(FailAt::Validate) {
            return Err(ValidationError::missing(&self.name, "token"));
        }
        Ok(())
    }

    fn load(&mut self, _config: &IntegrationsConfig) -> Result<(), FetchError> {
        self.record("load");
        if self.fail_at == Some(FailAt::Load) {
            return Err(FetchError::Client("connection refused".to_string()));
        }
        self.loaded = true;
        Ok(())
    }

    fn generate_message(&self, options: &MessageOptions) -> Result<Message, RenderError> {
        self.record("render");
        if !self.loaded || self.fail_at == Some(FailAt::Render) {
            return Err(NotLoadedError::new(&self.name).into());
        }

        let attachments = (0..self.attachments)
            .map(|i| Attachment {
                color: options.color.clone(),
                author_name: format!("{} {}", self.name, i),
                ..Default::default()
            })
            .collect();
        Ok(Message::with_attachments(attachments))
    }
}

/// Alerter with canned behavior; keeps every message it was given
pub struct ScriptedAlerter {
    name: String,
    enabled: bool,
    fail_at: Option<FailAt>,
    calls: CallLog,
    delivered: Arc<Mutex<Vec<Message>>>,
}

impl ScriptedAlerter {
    pub fn new(name: &str, calls: CallLog) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            fail_at: None,
            calls,
            delivered: Arc::default(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Handle on the delivered messages, valid after the alerter is boxed
    pub fn delivered(&self) -> Arc<Mutex<Vec<Message>>> {
        Arc::clone(&self.delivered)
    }

    fn record(&self, step: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, step));
    }
}

impl Alerter for ScriptedAlerter {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, _config: &AlertConfig) -> bool {
        self.enabled
    }

    fn load(&mut self, _config: &AlertConfig) -> Result<(), ValidationError> {
        self.record("load");
        if self.fail_at == Some(FailAt::AlerterLoad) {
            return Err(ValidationError::missing(&self.name, "webhook"));
        }
        Ok(())
    }

    fn channel(&self) -> &str {
        "#test"
    }

    fn alert(&self, message: &Message) -> Result<(), DeliveryError> {
        self.record("alert");
        if self.fail_at == Some(FailAt::Alert) {
            return Err(DeliveryError::Status {
                status: 404,
                body: "no_service".to_string(),
            });
        }
        self.delivered.lock().unwrap().push(message.clone());
        Ok(())
    }
}
