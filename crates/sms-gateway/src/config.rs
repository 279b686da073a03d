//! Configuration for the SMS gateway client.

use std::time::Duration;

/// Default sender id shown on the handset.
pub const DEFAULT_SENDER_ID: &str = "CIVIC";

/// Where and how to reach the SMS gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API (e.g., "https://sms.example.com/v1").
    pub base_url: String,
    /// Bearer token, if the gateway requires one.
    pub token: Option<String>,
    /// Sender id attached to every message.
    pub sender_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            sender_id: DEFAULT_SENDER_ID.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = sender_id.into();
        self
    }

    /// Get the send endpoint URL.
    pub fn send_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("sender_id", &self.sender_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_url_strips_trailing_slash() {
        let config = GatewayConfig::new("http://localhost:9000/");
        assert_eq!(config.send_url(), "http://localhost:9000/messages");
    }

    #[test]
    fn test_debug_hides_token() {
        let config = GatewayConfig::new("http://localhost:9000").with_token("s3cret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }
}
