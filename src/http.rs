//! Shared blocking HTTP client construction

use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("remind-us/", env!("CARGO_PKG_VERSION"));

/// Build a blocking client with a per-request deadline
pub fn build_client(timeout: Duration, headers: HeaderMap) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
}

/// Collapse a response body to a short single-line message
pub fn summarize_body(body: &str) -> String {
    // GitLab returns errors as {"message": "..."} or {"error": "..."}
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(m) = value.get("message").or_else(|| value.get("error")) {
            return m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string());
        }
    }

    let line = body.lines().next().unwrap_or_default().trim();
    line.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_json_message() {
        assert_eq!(summarize_body(r#"{"message":"404 Group Not Found"}"#), "404 Group Not Found");
        assert_eq!(summarize_body(r#"{"error":"invalid_token"}"#), "invalid_token");
    }

    #[test]
    fn test_summarize_plain_text() {
        assert_eq!(summarize_body("no_service\nmore"), "no_service");
        assert_eq!(summarize_body(""), "");
    }

    #[test]
    fn test_user_agent_has_version() {
        assert!(USER_AGENT.starts_with("remind-us/"));
    }
}
