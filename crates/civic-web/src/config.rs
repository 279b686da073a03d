//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

/// Civic web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Directory uploaded photos are written to and served from.
    pub uploads_dir: PathBuf,
    /// SMS gateway base URL. Codes are only logged when unset.
    pub sms_gateway_url: Option<String>,
    /// Bearer token for the SMS gateway.
    pub sms_gateway_token: Option<String>,
    /// Return issued codes in the request-otp response.
    pub otp_demo_mode: bool,
    /// Seed demo users into an empty database at startup.
    pub seed_demo_data: bool,
    /// Lifetime of a login session.
    pub session_ttl: Duration,
    /// Request body cap.
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CIVIC_ADDR` | Server bind address | `127.0.0.1:5000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:civic_system.db?mode=rwc` |
    /// | `UPLOADS_DIR` | Photo directory | `static/uploads` |
    /// | `SMS_GATEWAY_URL` | SMS gateway base URL | (unset: log codes) |
    /// | `SMS_GATEWAY_TOKEN` | SMS gateway bearer token | (unset) |
    /// | `OTP_DEMO_MODE` | Echo codes in responses | `false` |
    /// | `SEED_DEMO_DATA` | Seed demo users | `false` |
    /// | `SESSION_TTL_HOURS` | Session lifetime | `168` |
    /// | `MAX_BODY_BYTES` | Request body cap | `16777216` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("CIVIC_ADDR")
            .unwrap_or_else(|| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite:civic_system.db?mode=rwc".to_string());

        let uploads_dir = lookup("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static/uploads"));

        let sms_gateway_url = lookup("SMS_GATEWAY_URL").filter(|v| !v.trim().is_empty());
        let sms_gateway_token = lookup("SMS_GATEWAY_TOKEN").filter(|v| !v.trim().is_empty());

        let otp_demo_mode = parse_flag("OTP_DEMO_MODE", lookup("OTP_DEMO_MODE"))?;
        let seed_demo_data = parse_flag("SEED_DEMO_DATA", lookup("SEED_DEMO_DATA"))?;

        let session_ttl_hours = parse_number("SESSION_TTL_HOURS", lookup("SESSION_TTL_HOURS"), 168)?;
        if session_ttl_hours == 0 {
            return Err(ConfigError::InvalidNumber {
                var: "SESSION_TTL_HOURS",
                value: "0".to_string(),
            });
        }
        let max_body_bytes =
            parse_number("MAX_BODY_BYTES", lookup("MAX_BODY_BYTES"), 16 * 1024 * 1024)?;

        Ok(Self {
            addr,
            database_url,
            uploads_dir,
            sms_gateway_url,
            sms_gateway_token,
            otp_demo_mode,
            seed_demo_data,
            session_ttl: Duration::hours(session_ttl_hours as i64),
            max_body_bytes: max_body_bytes as usize,
        })
    }
}

fn parse_flag(var: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { var, value }),
    }
}

fn parse_number(var: &'static str, value: Option<String>, default: u32) -> Result<u32, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CIVIC_ADDR format")]
    InvalidAddr,

    #[error("{var} must be true or false, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },

    #[error("{var} must be a positive whole number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}
