//! Session context passed into every engine call.

use database::{Role, User};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Which complaints an official's session is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "pincode", rename_all = "snake_case")]
pub enum Jurisdiction {
    /// A single postal area.
    Pincode(String),
    /// Explicit grant to see every area.
    AllJurisdictions,
    /// No pincode chosen and no grant held.
    Unscoped,
}

impl Jurisdiction {
    pub fn pincode(&self) -> Option<&str> {
        match self {
            Jurisdiction::Pincode(pincode) => Some(pincode),
            _ => None,
        }
    }
}

/// Immutable identity and scope of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: i64,
    pub role: Role,
    pub name: String,
    pub phone: Option<String>,
    pub jurisdiction: Jurisdiction,
    pub department: Option<String>,
}

impl SessionContext {
    /// Session for a citizen after OTP verification.
    pub fn citizen(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            name: user.name.clone(),
            phone: user.phone.clone(),
            jurisdiction: Jurisdiction::Unscoped,
            department: None,
        }
    }

    /// Session for an official after password login.
    ///
    /// Jurisdiction resolves to the requested pincode, then the user's home
    /// pincode, then the all-jurisdiction grant if the user holds one.
    pub fn official(user: &User, requested_pincode: Option<&str>) -> Self {
        let jurisdiction = match requested_pincode.or(user.pincode.as_deref()) {
            Some(pincode) => Jurisdiction::Pincode(pincode.to_string()),
            None if user.statewide_access => Jurisdiction::AllJurisdictions,
            None => Jurisdiction::Unscoped,
        };

        Self {
            user_id: user.id,
            role: user.role,
            name: user.name.clone(),
            phone: user.phone.clone(),
            jurisdiction,
            department: user.department.clone(),
        }
    }

    /// Fail with `AccessDenied` unless the session acts under `role`.
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role != role {
            tracing::warn!(
                user_id = self.user_id,
                role = %self.role,
                required = %role,
                "Role check failed"
            );
            return Err(EngineError::AccessDenied);
        }
        Ok(())
    }
}
