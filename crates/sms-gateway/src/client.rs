//! SMS gateway HTTP client.

use async_trait::async_trait;
use engine::{Notifier, NotifyError};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Body posted to the gateway's send endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct OutboundSms<'a> {
    pub to: &'a str,
    pub message: String,
    pub sender: &'a str,
}

/// Text of the login code message.
pub fn otp_message(code: &str) -> String {
    format!("Your verification code is {}", code)
}

/// Client for an HTTP SMS gateway.
#[derive(Clone)]
pub struct SmsGateway {
    http: Client,
    config: GatewayConfig,
}

impl SmsGateway {
    /// Build a client. No request is made until the first send.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(GatewayError::Config(format!(
                "base URL must be http(s): {}",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send a text message to a phone number.
    pub async fn send_text(&self, to: &str, message: String) -> Result<(), GatewayError> {
        let body = OutboundSms {
            to,
            message,
            sender: &self.config.sender_id,
        };
        let url = self.config.send_url();
        debug!("SMS send: {} -> {}", url, to);

        let mut request = self.http.post(&url).json(&body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(GatewayError::Http)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(to = %to, "SMS accepted by gateway");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmsGateway {
    async fn send(&self, phone: &str, code: &str) -> Result<(), NotifyError> {
        self.send_text(phone, otp_message(code))
            .await
            .map_err(|e| NotifyError(e.to_string()))
    }

    fn name(&self) -> &str {
        "SmsGateway"
    }
}

impl std::fmt::Debug for SmsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsGateway")
            .field("config", &self.config)
            .finish()
    }
}
