//! JSON projections of engine records.

use database::{Complaint, FakeInvestigation, Priority, Role, Status};
use engine::{Jurisdiction, SessionContext};
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A complaint as shown to API clients.
#[derive(Debug, Serialize)]
pub struct ComplaintView {
    pub id: i64,
    pub complaint_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub category: String,
    pub description: String,
    pub district: String,
    pub pincode: String,
    pub location: String,
    pub coordinates: String,
    pub status: Status,
    pub priority: Priority,
    pub forwarded_department: String,
    pub created_at: String,
    pub updated_at: String,
    pub resolved_at: Option<String>,
    pub photo_url: Option<String>,
    pub resolved_photo_url: Option<String>,
    pub reporter_name: String,
    pub reporter_phone: String,
    pub resolution_notes: String,
    pub resolved_coordinates: String,
    pub is_fake: bool,
}

impl From<&Complaint> for ComplaintView {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id,
            complaint_id: c.reference_code.clone(),
            title: c.category.clone(),
            category: c.category.clone(),
            description: c.description.clone(),
            district: c.district.clone(),
            pincode: c.pincode.clone(),
            location: c.location.clone(),
            coordinates: c.coordinates.clone().unwrap_or_default(),
            status: c.status,
            priority: c.priority,
            forwarded_department: c.forwarded_department.clone().unwrap_or_default(),
            created_at: c.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: c.updated_at.format(TIMESTAMP_FORMAT).to_string(),
            resolved_at: c.resolved_at.map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            photo_url: c.photo_path.clone(),
            resolved_photo_url: c.resolved_photo_path.clone(),
            reporter_name: c
                .reporter_name
                .clone()
                .unwrap_or_else(|| "Anonymous".to_string()),
            reporter_phone: c.contact_phone.clone().unwrap_or_else(|| "N/A".to_string()),
            resolution_notes: c.resolution_notes.clone().unwrap_or_default(),
            resolved_coordinates: c.resolved_coordinates.clone().unwrap_or_default(),
            is_fake: c.is_fake,
        }
    }
}

/// A police investigation record.
#[derive(Debug, Serialize)]
pub struct InvestigationView {
    pub id: i64,
    pub investigated_by: i64,
    pub reason: String,
    pub evidence: String,
    pub created_at: String,
}

impl From<&FakeInvestigation> for InvestigationView {
    fn from(i: &FakeInvestigation) -> Self {
        Self {
            id: i.id,
            investigated_by: i.investigated_by,
            reason: i.reason.clone(),
            evidence: i.evidence.clone().unwrap_or_default(),
            created_at: i.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Who the caller is logged in as.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub role: Role,
    pub name: String,
    pub jurisdiction: Jurisdiction,
    pub department: Option<String>,
}

impl From<&SessionContext> for SessionView {
    fn from(s: &SessionContext) -> Self {
        Self {
            role: s.role,
            name: s.name.clone(),
            jurisdiction: s.jurisdiction.clone(),
            department: s.department.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_complaint_projection_fallbacks() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let complaint = Complaint {
            id: 3,
            reference_code: "CMP-20250301093000-0007".to_string(),
            reporter_id: 1,
            reporter_name: None,
            contact_phone: None,
            category: "Water".to_string(),
            description: "Burst main".to_string(),
            district: "Chennai".to_string(),
            pincode: "600001".to_string(),
            location: "Anna Salai".to_string(),
            coordinates: None,
            status: Status::Submitted,
            priority: Priority::High,
            photo_path: Some("/static/uploads/CMP-20250301093000-0007_1.jpg".to_string()),
            resolved_photo_path: None,
            resolved_coordinates: None,
            forwarded_department: None,
            assigned_to: None,
            verified_by: None,
            is_fake: false,
            resolution_notes: None,
            version: 0,
            created_at: created,
            updated_at: created,
            resolved_at: None,
        };

        let json = serde_json::to_value(ComplaintView::from(&complaint)).unwrap();
        assert_eq!(json["complaint_id"], "CMP-20250301093000-0007");
        assert_eq!(json["title"], "Water");
        assert_eq!(json["type"], "Water");
        assert_eq!(json["status"], "submitted");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["created_at"], "2025-03-01 09:30:00");
        assert_eq!(json["reporter_name"], "Anonymous");
        assert_eq!(json["reporter_phone"], "N/A");
        assert_eq!(json["coordinates"], "");
        assert_eq!(json["forwarded_department"], "");
        assert!(json["resolved_photo_url"].is_null());
        assert_eq!(
            json["photo_url"],
            "/static/uploads/CMP-20250301093000-0007_1.jpg"
        );
    }
}
