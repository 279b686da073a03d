//! Role-scoped complaint visibility.

use database::{Complaint, ComplaintFilter, Role, Status};

use crate::session::{Jurisdiction, SessionContext};

/// The set of complaints a session may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// The session sees nothing.
    Nothing,
    /// The session sees complaints matching the filter.
    Filtered(ComplaintFilter),
}

impl Visibility {
    /// Project a session onto the complaints it may see.
    ///
    /// - citizen: own complaints
    /// - municipal: complaints in the session pincode; everything with the
    ///   all-jurisdiction grant; nothing when unscoped
    /// - department: complaints forwarded to the officer's department, within
    ///   the pincode if one is set, otherwise only past `submitted`
    /// - police: complaints flagged fake, within the pincode if one is set
    pub fn for_session(session: &SessionContext) -> Self {
        match session.role {
            Role::Citizen => Visibility::Filtered(ComplaintFilter {
                reporter_id: Some(session.user_id),
                ..Default::default()
            }),
            Role::Municipal => match &session.jurisdiction {
                Jurisdiction::Pincode(pincode) => Visibility::Filtered(ComplaintFilter {
                    pincode: Some(pincode.clone()),
                    ..Default::default()
                }),
                Jurisdiction::AllJurisdictions => Visibility::Filtered(ComplaintFilter::default()),
                Jurisdiction::Unscoped => Visibility::Nothing,
            },
            Role::Department => {
                let Some(department) = session.department.clone() else {
                    return Visibility::Nothing;
                };
                let filter = match session.jurisdiction.pincode() {
                    Some(pincode) => ComplaintFilter {
                        forwarded_department: Some(department),
                        pincode: Some(pincode.to_string()),
                        ..Default::default()
                    },
                    None => ComplaintFilter {
                        forwarded_department: Some(department),
                        statuses: Some(vec![Status::Assigned, Status::InProgress, Status::Resolved]),
                        ..Default::default()
                    },
                };
                Visibility::Filtered(filter)
            }
            Role::Police => Visibility::Filtered(ComplaintFilter {
                fake_only: true,
                pincode: session.jurisdiction.pincode().map(str::to_string),
                ..Default::default()
            }),
        }
    }

    /// Check a single complaint.
    pub fn permits(&self, complaint: &Complaint) -> bool {
        match self {
            Visibility::Nothing => false,
            Visibility::Filtered(filter) => filter.matches(complaint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use database::Priority;

    fn session(role: Role, jurisdiction: Jurisdiction, department: Option<&str>) -> SessionContext {
        SessionContext {
            user_id: 1,
            role,
            name: "Officer".to_string(),
            phone: None,
            jurisdiction,
            department: department.map(str::to_string),
        }
    }

    fn complaint(reporter_id: i64, pincode: &str) -> Complaint {
        let now = Utc::now();
        Complaint {
            id: 1,
            reference_code: "CMP-20250301000000-0001".to_string(),
            reporter_id,
            reporter_name: None,
            contact_phone: None,
            category: "Roads".to_string(),
            description: "Pothole".to_string(),
            district: "Chennai".to_string(),
            pincode: pincode.to_string(),
            location: "Market Road".to_string(),
            coordinates: None,
            status: Status::Submitted,
            priority: Priority::Medium,
            photo_path: None,
            resolved_photo_path: None,
            resolved_coordinates: None,
            forwarded_department: None,
            assigned_to: None,
            verified_by: None,
            is_fake: false,
            resolution_notes: None,
            version: 0,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    #[test]
    fn test_citizen_sees_only_own() {
        let citizen = session(Role::Citizen, Jurisdiction::Unscoped, None);
        let vis = Visibility::for_session(&citizen);
        assert!(vis.permits(&complaint(1, "600001")));
        assert!(!vis.permits(&complaint(2, "600001")));
    }

    #[test]
    fn test_municipal_scoping() {
        let scoped = Visibility::for_session(&session(
            Role::Municipal,
            Jurisdiction::Pincode("600001".to_string()),
            None,
        ));
        assert!(scoped.permits(&complaint(5, "600001")));
        assert!(!scoped.permits(&complaint(5, "600002")));

        let statewide =
            Visibility::for_session(&session(Role::Municipal, Jurisdiction::AllJurisdictions, None));
        assert!(statewide.permits(&complaint(5, "600002")));

        let unscoped =
            Visibility::for_session(&session(Role::Municipal, Jurisdiction::Unscoped, None));
        assert_eq!(unscoped, Visibility::Nothing);
        assert!(!unscoped.permits(&complaint(5, "600001")));
    }

    #[test]
    fn test_department_scoping() {
        let mut forwarded = complaint(5, "600001");
        forwarded.status = Status::Assigned;
        forwarded.forwarded_department = Some("Public Works".to_string());

        let unscoped = Visibility::for_session(&session(
            Role::Department,
            Jurisdiction::Unscoped,
            Some("Public Works"),
        ));
        assert!(unscoped.permits(&forwarded));

        let other_dept = Visibility::for_session(&session(
            Role::Department,
            Jurisdiction::Unscoped,
            Some("Sanitation"),
        ));
        assert!(!other_dept.permits(&forwarded));

        let other_pincode = Visibility::for_session(&session(
            Role::Department,
            Jurisdiction::Pincode("600002".to_string()),
            Some("Public Works"),
        ));
        assert!(!other_pincode.permits(&forwarded));

        let mut fresh = forwarded.clone();
        fresh.status = Status::Submitted;
        assert!(!unscoped.permits(&fresh));

        let no_department =
            Visibility::for_session(&session(Role::Department, Jurisdiction::Unscoped, None));
        assert_eq!(no_department, Visibility::Nothing);
    }

    #[test]
    fn test_police_sees_only_fake() {
        let police = Visibility::for_session(&session(Role::Police, Jurisdiction::Unscoped, None));
        let mut c = complaint(5, "600001");
        assert!(!police.permits(&c));
        c.is_fake = true;
        assert!(police.permits(&c));

        let scoped = Visibility::for_session(&session(
            Role::Police,
            Jurisdiction::Pincode("600002".to_string()),
            None,
        ));
        assert!(!scoped.permits(&c));
    }
}
