//! Rendered chat message
//!
//! Serializes to a chat-webhook payload. Empty fields are omitted.

use serde::{Deserialize, Serialize};

/// Default attachment colour
pub const DEFAULT_COLOR: &str = "good";

/// Message produced by a source and consumed by alerters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn with_attachments(attachments: Vec<Attachment>) -> Self {
        Self {
            attachments,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}

/// One block of a message: one project or one feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_icon: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer_icon: String,
    /// Unix seconds at render time
    #[serde(default)]
    pub ts: i64,
}

impl Attachment {
    /// Same attachment with the render timestamp cleared
    pub fn without_timestamp(&self) -> Self {
        Self {
            ts: 0,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentField {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub short: bool,
}

impl AttachmentField {
    pub fn line(value: String) -> Self {
        Self {
            title: String::new(),
            value,
            short: false,
        }
    }
}

/// Per-render options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOptions {
    /// Attachment colour, a named colour or a hex code
    pub color: String,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
        }
    }
}
