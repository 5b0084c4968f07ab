//! Unified error types for remind-us
//!
//! This module defines all error types used throughout the application.
//! Each pipeline stage has its own error kind; `AppError` wraps them with the
//! name of the failing source or alerter without changing the kind.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration file loading
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A source's configuration did not validate
    #[error("Could not validate '{integration}' config: {source}")]
    Validate {
        integration: String,
        source: ValidationError,
    },

    /// A source failed to fetch its data
    #[error("Unable to load integration '{integration}': {source}")]
    Load {
        integration: String,
        source: FetchError,
    },

    /// A source failed to render its message
    #[error("Unable to generate message for integration '{integration}': {source}")]
    Render {
        integration: String,
        source: RenderError,
    },

    /// An alerter's configuration did not validate
    #[error("Unable to load alerter '{alerter}' for integration '{integration}': {source}")]
    AlerterLoad {
        alerter: String,
        integration: String,
        source: ValidationError,
    },

    /// An alerter failed to deliver a message
    #[error("Unable to alert message for alerter '{alerter}' (integration '{integration}'): {source}")]
    Alert {
        alerter: String,
        integration: String,
        source: DeliveryError,
    },

    /// Shared HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    /// Writing to stdout failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from configuration file loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Config file exists but could not be read
    #[error("Unable to read config file '{path}': {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Unable to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Missing or invalid required configuration, detected before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent or empty
    #[error("{component}: missing required field '{field}'")]
    MissingField { component: String, field: String },

    /// Field present but unusable
    #[error("{component}: invalid value for '{field}': {message}")]
    InvalidValue {
        component: String,
        field: String,
        message: String,
    },
}

impl ValidationError {
    pub fn missing(component: &str, field: &str) -> Self {
        Self::MissingField {
            component: component.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid(component: &str, field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            component: component.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors raised while fetching source data
#[derive(Error, Debug)]
pub enum FetchError {
    /// API client could not be constructed
    #[error("Unable to create client: {0}")]
    Client(String),

    /// Transport-level failure
    #[error("Request to '{endpoint}' failed: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Request to '{endpoint}' returned {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Unable to decode response from '{endpoint}': {message}")]
    Decode { endpoint: String, message: String },

    /// Local feed file could not be read
    #[error("Unable to read feed file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Feed document could not be parsed
    #[error("Could not parse feed '{url}': {message}")]
    Parse { url: String, message: String },

    /// Lookback duration string could not be parsed
    #[error("Invalid lookback '{value}' for feed '{url}': {message}")]
    InvalidLookback {
        url: String,
        value: String,
        message: String,
    },

    /// Title regex could not be compiled
    #[error("Invalid title pattern '{pattern}' for feed '{url}': {source}")]
    InvalidPattern {
        url: String,
        pattern: String,
        source: regex::Error,
    },

    /// Failure annotated with the group or project involved
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Wrap with the identifier of the call that failed
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// An operation was invoked before a successful `load`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{component} is not loaded")]
pub struct NotLoadedError {
    pub component: String,
}

impl NotLoadedError {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
        }
    }
}

/// Errors from message construction
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    NotLoaded(#[from] NotLoadedError),
}

/// Errors from delivering a rendered message
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error(transparent)]
    NotLoaded(#[from] NotLoadedError),

    /// Payload could not be serialized
    #[error("Unable to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// Transport-level failure
    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Webhook answered with a non-success status
    #[error("Webhook returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
