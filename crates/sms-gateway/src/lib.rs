//! SMS gateway client.
//!
//! Delivers one-time login codes over a simple HTTP gateway API: a JSON
//! `POST <base_url>/messages` with `to`, `message` and `sender` fields and an
//! optional bearer token. [`SmsGateway`] implements [`engine::Notifier`] so it
//! can be handed straight to the OTP manager.
//!
//! # Example
//!
//! ```no_run
//! use sms_gateway::{GatewayConfig, SmsGateway};
//!
//! # async fn example() -> Result<(), sms_gateway::GatewayError> {
//! let config = GatewayConfig::new("https://sms.example.com/v1").with_token("token");
//! let gateway = SmsGateway::new(config)?;
//! gateway.send_text("9876543210", "Hello".to_string()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{otp_message, SmsGateway};
pub use config::GatewayConfig;
pub use error::GatewayError;
