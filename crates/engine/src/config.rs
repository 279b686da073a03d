//! Engine configuration.

use chrono::Duration;

/// Tunables for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long an issued OTP stays valid.
    pub otp_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::minutes(10),
        }
    }
}
