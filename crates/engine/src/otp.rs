//! OTP challenge manager for citizen phone login.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use database::validation::validate_phone;
use database::{otp, user, Database, OtpChallenge, User};
use rand::Rng;
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::notifier::Notifier;

/// A freshly issued code.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedOtp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedOtp")
            .field("code", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Uniformly random 6-digit code, zero padded.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}

/// Issues, validates and consumes one-time login codes.
#[derive(Clone)]
pub struct OtpManager {
    db: Database,
    notifier: Arc<dyn Notifier>,
    ttl: Duration,
}

impl OtpManager {
    pub fn new(db: Database, notifier: Arc<dyn Notifier>, ttl: Duration) -> Self {
        Self { db, notifier, ttl }
    }

    /// Issue a code for a registered phone.
    pub async fn issue(&self, phone: &str) -> Result<IssuedOtp> {
        self.issue_at(phone, Utc::now()).await
    }

    /// Issue a code as of `now`.
    ///
    /// Any earlier challenge for the phone is replaced. Delivery failures are
    /// logged and do not fail the call.
    pub async fn issue_at(&self, phone: &str, now: DateTime<Utc>) -> Result<IssuedOtp> {
        let phone = phone.trim();
        validate_phone(phone)?;

        if user::find_by_phone(self.db.pool(), phone).await?.is_none() {
            return Err(EngineError::NotRegistered);
        }

        let challenge = OtpChallenge {
            phone: phone.to_string(),
            code: generate_code(),
            issued_at: now,
            expires_at: now + self.ttl,
        };
        otp::upsert_challenge(self.db.pool(), &challenge).await?;
        info!(phone = %phone, expires_at = %challenge.expires_at, "OTP issued");

        if let Err(err) = self.notifier.send(phone, &challenge.code).await {
            warn!(
                phone = %phone,
                notifier = self.notifier.name(),
                error = %err,
                "OTP delivery failed"
            );
        }

        Ok(IssuedOtp {
            code: challenge.code,
            expires_at: challenge.expires_at,
        })
    }

    /// Verify a code and consume it.
    pub async fn verify(&self, phone: &str, code: &str) -> Result<User> {
        self.verify_at(phone, code, Utc::now()).await
    }

    /// Verify a code as of `now`.
    ///
    /// An expired challenge is left in place; only a successful verification
    /// deletes it.
    pub async fn verify_at(&self, phone: &str, code: &str, now: DateTime<Utc>) -> Result<User> {
        let phone = phone.trim();
        let code = code.trim();

        let mut tx = self.db.begin().await?;

        let challenge = otp::find_challenge(&mut *tx, phone, code)
            .await?
            .ok_or(EngineError::InvalidCode)?;

        if now > challenge.expires_at {
            info!(phone = %phone, "OTP expired");
            return Err(EngineError::OtpExpired);
        }

        let user = user::find_by_phone(&mut *tx, phone)
            .await?
            .ok_or(EngineError::NotRegistered)?;

        if !otp::delete_challenge(&mut *tx, phone).await? {
            return Err(EngineError::InvalidCode);
        }
        Database::commit(tx).await?;

        info!(user_id = user.id, "OTP verified");
        Ok(user)
    }
}
