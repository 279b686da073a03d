//! Identity and credential store.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use database::validation::validate_pincode;
use database::{user, Database, Role, User};
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::session::SessionContext;

/// Hash a password with Argon2id into a PHC string.
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| EngineError::Crypto(format!("hash error: {e}")))
}

/// Verify a plaintext password against the user's stored hash.
///
/// Users without a hash (citizens) never match.
pub fn verify_password(user: &User, plaintext: &str) -> bool {
    match user.password_hash.as_deref() {
        Some(hash) => verify_against(hash, plaintext),
        None => false,
    }
}

fn verify_against(hash: &str, plaintext: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Burn one verification so unknown ids cost as much as wrong passwords.
fn verify_dummy(plaintext: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    let hash = DUMMY_HASH.get_or_init(|| hash_password("civic-dummy-credential").ok());
    if let Some(hash) = hash {
        let _ = verify_against(hash, plaintext);
    }
}

/// Read-only access to user records and credentials.
#[derive(Debug, Clone)]
pub struct Identity {
    db: Database,
}

impl Identity {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Find the citizen registered with a phone.
    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        Ok(user::find_by_phone(self.db.pool(), phone).await?)
    }

    /// Find an official by external id; the role must match exactly.
    pub async fn find_by_external_id(&self, external_id: &str, role: Role) -> Result<Option<User>> {
        Ok(user::find_by_external_id(self.db.pool(), external_id, role).await?)
    }

    /// Authenticate an official and build their session.
    ///
    /// `pincode` is the jurisdiction chosen at login; blank means none.
    pub async fn official_login(
        &self,
        external_id: &str,
        password: &str,
        role: Role,
        pincode: Option<&str>,
    ) -> Result<SessionContext> {
        let pincode = pincode.map(str::trim).filter(|p| !p.is_empty());
        if let Some(pincode) = pincode {
            validate_pincode(pincode)?;
        }

        if !role.is_official() {
            return Err(EngineError::InvalidCredentials);
        }

        let user = match self.find_by_external_id(external_id.trim(), role).await? {
            Some(user) => user,
            None => {
                verify_dummy(password);
                info!(external_id = %external_id, role = %role, "Login failed");
                return Err(EngineError::InvalidCredentials);
            }
        };

        if !verify_password(&user, password) {
            info!(external_id = %external_id, role = %role, "Login failed");
            return Err(EngineError::InvalidCredentials);
        }

        let session = SessionContext::official(&user, pincode);
        info!(
            user_id = user.id,
            role = %role,
            jurisdiction = ?session.jurisdiction,
            "Official logged in"
        );
        Ok(session)
    }
}
