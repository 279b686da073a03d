//! Database models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Error returned when parsing a closed enum from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// The role a user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Municipal,
    #[serde(alias = "dept")]
    Department,
    Police,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Municipal => "municipal",
            Role::Department => "department",
            Role::Police => "police",
        }
    }

    /// Officials log in with an external id and password; citizens use phone + OTP.
    pub fn is_official(&self) -> bool {
        !matches!(self, Role::Citizen)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "citizen" => Ok(Role::Citizen),
            "municipal" => Ok(Role::Municipal),
            "department" | "dept" => Ok(Role::Department),
            "police" => Ok(Role::Police),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// Complaint lifecycle status.
///
/// Statuses are ordered: a complaint only ever moves forward through
/// `submitted -> assigned -> in_progress -> resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Status {
    Submitted,
    Assigned,
    InProgress,
    Resolved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Submitted => "submitted",
            Status::Assigned => "assigned",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
        }
    }

    /// Position in the lifecycle.
    pub fn rank(&self) -> u8 {
        match self {
            Status::Submitted => 0,
            Status::Assigned => 1,
            Status::InProgress => 2,
            Status::Resolved => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submitted" => Ok(Status::Submitted),
            "assigned" => Ok(Status::Assigned),
            "in_progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// Complaint priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// A registered user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// 10-digit phone number (citizen login).
    pub phone: Option<String>,
    /// Official login ID (e.g. "MUN001").
    pub external_id: Option<String>,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: Role,
    /// Display name
    pub name: String,
    /// Department affiliation (department officers only).
    pub department: Option<String>,
    /// Home jurisdiction pincode.
    pub pincode: Option<String>,
    /// Grants visibility across all jurisdictions when no pincode is chosen.
    pub statewide_access: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("phone", &self.phone)
            .field("external_id", &self.external_id)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .field("name", &self.name)
            .field("department", &self.department)
            .field("pincode", &self.pincode)
            .field("statewide_access", &self.statewide_access)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fields for inserting a user.
#[derive(Clone)]
pub struct NewUser {
    pub phone: Option<String>,
    pub external_id: Option<String>,
    pub password_hash: Option<String>,
    pub role: Role,
    pub name: String,
    pub department: Option<String>,
    pub pincode: Option<String>,
    pub statewide_access: bool,
}

impl NewUser {
    /// A citizen identified by phone.
    pub fn citizen(phone: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            external_id: None,
            password_hash: None,
            role: Role::Citizen,
            name: name.into(),
            department: None,
            pincode: None,
            statewide_access: false,
        }
    }

    /// An official identified by external id and password hash.
    pub fn official(
        role: Role,
        external_id: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            phone: None,
            external_id: Some(external_id.into()),
            password_hash: Some(password_hash.into()),
            role,
            name: name.into(),
            department: None,
            pincode: None,
            statewide_access: false,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_pincode(mut self, pincode: impl Into<String>) -> Self {
        self.pincode = Some(pincode.into());
        self
    }

    pub fn with_statewide_access(mut self) -> Self {
        self.statewide_access = true;
        self
    }
}

/// A live one-time code for phone login.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct OtpChallenge {
    pub phone: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for OtpChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpChallenge")
            .field("phone", &self.phone)
            .field("code", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A citizen complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Complaint {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Public code, `CMP-YYYYMMDDHHMMSS-NNNN`.
    pub reference_code: String,
    pub reporter_id: i64,
    /// Reporter name at submission time.
    pub reporter_name: Option<String>,
    /// Contact phone at submission time.
    pub contact_phone: Option<String>,
    pub category: String,
    pub description: String,
    pub district: String,
    pub pincode: String,
    pub location: String,
    pub coordinates: Option<String>,
    pub status: Status,
    pub priority: Priority,
    pub photo_path: Option<String>,
    pub resolved_photo_path: Option<String>,
    pub resolved_coordinates: Option<String>,
    pub forwarded_department: Option<String>,
    pub assigned_to: Option<i64>,
    pub verified_by: Option<i64>,
    pub is_fake: bool,
    pub resolution_notes: Option<String>,
    /// Bumped on every update.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Fields for inserting a complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub reference_code: String,
    pub reporter_id: i64,
    pub reporter_name: Option<String>,
    pub contact_phone: Option<String>,
    pub category: String,
    pub description: String,
    pub district: String,
    pub pincode: String,
    pub location: String,
    pub coordinates: Option<String>,
    pub priority: Priority,
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A police investigation into a fake complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FakeInvestigation {
    /// Auto-incrementing ID.
    pub id: i64,
    pub complaint_id: i64,
    pub investigated_by: i64,
    pub reason: String,
    pub evidence: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting an investigation.
#[derive(Debug, Clone)]
pub struct NewFakeInvestigation {
    pub complaint_id: i64,
    pub investigated_by: i64,
    pub reason: String,
    pub evidence: Option<String>,
    pub created_at: DateTime<Utc>,
}
