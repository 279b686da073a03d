//! End-to-end tests for the complaint lifecycle.
//!
//! Each test runs against a fresh in-memory database seeded with the demo
//! users plus a few extra officials.
//!
//! Run with:
//!   cargo test -p engine --test lifecycle_test

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use database::{complaint, user, Database, NewUser, Role, Status};
use engine::identity::hash_password;
use engine::lifecycle::{DEFAULT_FAKE_REASON, FAKE_MARKER};
use engine::reference::is_reference_code;
use engine::seed::{seed_demo_users, DEMO_PASSWORD};
use engine::{
    ComplaintSubmission, Engine, EngineConfig, EngineError, Jurisdiction, MemoryBlobStore,
    Notifier, NotifyError, SessionContext, StatusUpdate,
};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn last_code(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == phone)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, phone: &str, code: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), code.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "RecordingNotifier"
    }
}

struct Harness {
    db: Database,
    engine: Engine,
    blobs: Arc<MemoryBlobStore>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    async fn new() -> Self {
        let db = Database::in_memory().await.unwrap();
        seed_demo_users(&db).await.unwrap();

        let hash = hash_password(DEMO_PASSWORD).unwrap();
        let extra = [
            NewUser::official(Role::Department, "DEPT101", hash.clone(), "Works Officer")
                .with_department("Public Works"),
            NewUser::official(Role::Municipal, "MUN900", hash.clone(), "State Officer")
                .with_statewide_access(),
            NewUser::official(Role::Municipal, "MUN901", hash, "Floating Officer"),
        ];
        for new in &extra {
            user::create_user(db.pool(), new).await.unwrap();
        }

        let blobs = Arc::new(MemoryBlobStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = Engine::new(
            db.clone(),
            notifier.clone(),
            blobs.clone(),
            EngineConfig::default(),
        );

        Self {
            db,
            engine,
            blobs,
            notifier,
        }
    }

    async fn citizen(&self, phone: &str) -> SessionContext {
        self.engine.otp.issue(phone).await.unwrap();
        let code = self.notifier.last_code(phone).unwrap();
        self.engine.citizen_login(phone, &code).await.unwrap()
    }

    async fn official(&self, external_id: &str, role: Role, pincode: Option<&str>) -> SessionContext {
        self.engine
            .official_login(external_id, DEMO_PASSWORD, role, pincode)
            .await
            .unwrap()
    }

    async fn works_officer(&self) -> SessionContext {
        self.official("DEPT101", Role::Department, None).await
    }
}

fn pothole() -> ComplaintSubmission {
    ComplaintSubmission {
        category: Some("Roads".to_string()),
        district: Some("Chennai".to_string()),
        pincode: Some("600001".to_string()),
        location: Some("Market Road".to_string()),
        description: Some("Pothole".to_string()),
        ..Default::default()
    }
}

fn assert_resolved_at_consistent(c: &database::Complaint) {
    assert_eq!(
        c.resolved_at.is_some(),
        c.status == Status::Resolved,
        "resolved_at out of step with status {:?}",
        c.status
    );
}

// ============================================================================
// The full citizen -> municipal -> department -> police path
// ============================================================================

#[tokio::test]
async fn test_complaint_full_lifecycle() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;

    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    assert_eq!(filed.status, Status::Submitted);
    assert!(is_reference_code(&filed.reference_code));
    assert_eq!(filed.reporter_name.as_deref(), Some("Rajesh Kumar"));
    assert_eq!(filed.contact_phone.as_deref(), Some("9876543210"));
    assert_resolved_at_consistent(&filed);

    let municipal = h.official("MUN001", Role::Municipal, None).await;
    assert_eq!(municipal.jurisdiction, Jurisdiction::Pincode("600001".to_string()));
    let forwarded = h
        .engine
        .complaints
        .forward(&municipal, filed.id, "Public Works")
        .await
        .unwrap();
    assert_eq!(forwarded.status, Status::Assigned);
    assert_eq!(forwarded.forwarded_department.as_deref(), Some("Public Works"));
    assert_eq!(forwarded.verified_by, Some(municipal.user_id));
    assert!(forwarded.updated_at >= filed.updated_at);

    let works = h.works_officer().await;
    let resolved = h
        .engine
        .complaints
        .update_status(
            &works,
            filed.id,
            StatusUpdate::new(Status::Resolved).with_notes("Filled pothole"),
        )
        .await
        .unwrap();
    assert_eq!(resolved.status, Status::Resolved);
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.resolution_notes.as_deref(), Some("Filled pothole"));

    let police = h.official("POLICE001", Role::Police, None).await;
    let (flagged, investigation) = h
        .engine
        .complaints
        .report_fake(&police, filed.id, "duplicate", None)
        .await
        .unwrap();
    assert!(flagged.is_fake);
    assert_eq!(flagged.status, Status::Resolved);
    assert_eq!(flagged.resolved_at, resolved.resolved_at);
    assert_eq!(investigation.complaint_id, filed.id);
    assert_eq!(investigation.reason, "duplicate");
    assert_eq!(investigation.investigated_by, police.user_id);

    let detail = h.engine.complaints.detail(&police, filed.id).await.unwrap();
    assert_eq!(detail.investigation.map(|i| i.id), Some(investigation.id));
}

#[tokio::test]
async fn test_start_work_then_resolve() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();

    let works = h.works_officer().await;
    let started = h.engine.complaints.start_work(&works, filed.id).await.unwrap();
    assert_eq!(started.status, Status::InProgress);
    assert_resolved_at_consistent(&started);

    let resolved = h
        .engine
        .complaints
        .resolve(&works, filed.id, Some("  "))
        .await
        .unwrap();
    assert_eq!(resolved.status, Status::Resolved);
    assert!(resolved.resolution_notes.is_none());
    assert_resolved_at_consistent(&resolved);

    // Resolving again keeps the first resolution time.
    let again = h
        .engine
        .complaints
        .resolve(&works, filed.id, Some("Rechecked"))
        .await
        .unwrap();
    assert_eq!(again.resolved_at, resolved.resolved_at);
    assert_eq!(again.resolution_notes.as_deref(), Some("Rechecked"));
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_role_checked_before_existence() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let works = h.works_officer().await;

    let denied = h.engine.complaints.forward(&citizen, 9999, "Public Works").await;
    assert!(matches!(denied, Err(EngineError::AccessDenied)));

    let missing = h.engine.complaints.start_work(&works, 9999).await;
    assert!(matches!(missing, Err(EngineError::NotFound { .. })));
}

#[tokio::test]
async fn test_each_transition_rejects_other_roles() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let municipal = h.official("MUN001", Role::Municipal, None).await;
    let police = h.official("POLICE001", Role::Police, None).await;
    let works = h.works_officer().await;
    let c = &h.engine.complaints;

    assert!(matches!(
        c.submit(&municipal, pothole()).await,
        Err(EngineError::AccessDenied)
    ));
    assert!(matches!(
        c.forward(&works, filed.id, "Public Works").await,
        Err(EngineError::AccessDenied)
    ));
    assert!(matches!(
        c.assign(&police, filed.id, works.user_id).await,
        Err(EngineError::AccessDenied)
    ));
    assert!(matches!(
        c.start_work(&municipal, filed.id).await,
        Err(EngineError::AccessDenied)
    ));
    assert!(matches!(
        c.resolve(&citizen, filed.id, None).await,
        Err(EngineError::AccessDenied)
    ));
    assert!(matches!(
        c.mark_fake(&police, filed.id, None).await,
        Err(EngineError::AccessDenied)
    ));
    assert!(matches!(
        c.report_fake(&works, filed.id, "spam", None).await,
        Err(EngineError::AccessDenied)
    ));

    let unchanged = complaint::get_complaint(h.db.pool(), filed.id).await.unwrap();
    assert_eq!(unchanged.version, filed.version);
}

#[tokio::test]
async fn test_assign_requires_department_officer() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let municipal = h.official("MUN001", Role::Municipal, None).await;
    let works = h.works_officer().await;

    let wrong = h
        .engine
        .complaints
        .assign(&municipal, filed.id, citizen.user_id)
        .await;
    assert!(matches!(wrong, Err(EngineError::Validation(_))));

    let assigned = h
        .engine
        .complaints
        .assign(&municipal, filed.id, works.user_id)
        .await
        .unwrap();
    assert_eq!(assigned.status, Status::Assigned);
    assert_eq!(assigned.assigned_to, Some(works.user_id));
    assert!(assigned.forwarded_department.is_none());
}

// ============================================================================
// Visibility
// ============================================================================

#[tokio::test]
async fn test_citizen_only_sees_own_complaints() {
    let h = Harness::new().await;
    let rajesh = h.citizen("9876543210").await;
    let priya = h.citizen("9876543211").await;

    let mine = h.engine.complaints.submit(&rajesh, pothole()).await.unwrap();
    let theirs = h.engine.complaints.submit(&priya, pothole()).await.unwrap();

    let listed = h.engine.complaints.list(&rajesh).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|c| c.reporter_id == rajesh.user_id));

    assert!(h.engine.complaints.detail(&rajesh, mine.id).await.is_ok());
    let hidden = h.engine.complaints.detail(&rajesh, theirs.id).await;
    assert!(matches!(hidden, Err(EngineError::NotFound { .. })));
}

#[tokio::test]
async fn test_police_only_see_fake_complaints() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let genuine = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let bogus = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();

    let police = h.official("POLICE001", Role::Police, None).await;
    assert!(h.engine.complaints.list(&police).await.unwrap().is_empty());

    h.engine
        .complaints
        .report_fake(&police, bogus.id, "staged photo", Some("CCTV clip 42"))
        .await
        .unwrap();

    let listed = h.engine.complaints.list(&police).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|c| c.is_fake));
    assert_eq!(listed[0].id, bogus.id);

    let hidden = h.engine.complaints.detail(&police, genuine.id).await;
    assert!(matches!(hidden, Err(EngineError::NotFound { .. })));
}

#[tokio::test]
async fn test_municipal_jurisdiction() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let elsewhere = ComplaintSubmission {
        pincode: Some("641001".to_string()),
        district: Some("Coimbatore".to_string()),
        ..pothole()
    };
    h.engine.complaints.submit(&citizen, elsewhere).await.unwrap();

    let home = h.official("MUN001", Role::Municipal, None).await;
    let listed = h.engine.complaints.list(&home).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].pincode, "600001");

    let chosen = h.official("MUN001", Role::Municipal, Some("641001")).await;
    let listed = h.engine.complaints.list(&chosen).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].pincode, "641001");

    let statewide = h.official("MUN900", Role::Municipal, None).await;
    assert_eq!(statewide.jurisdiction, Jurisdiction::AllJurisdictions);
    assert_eq!(h.engine.complaints.list(&statewide).await.unwrap().len(), 2);

    let floating = h.official("MUN901", Role::Municipal, None).await;
    assert_eq!(floating.jurisdiction, Jurisdiction::Unscoped);
    assert!(h.engine.complaints.list(&floating).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_department_sees_forwarded_only() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let forwarded = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let other = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();

    let municipal = h.official("MUN001", Role::Municipal, None).await;
    h.engine
        .complaints
        .forward(&municipal, forwarded.id, "Public Works")
        .await
        .unwrap();
    h.engine
        .complaints
        .forward(&municipal, other.id, "Fire Station")
        .await
        .unwrap();

    let works = h.works_officer().await;
    let listed = h.engine.complaints.list(&works).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, forwarded.id);

    let fire = h.official("DEPT003", Role::Department, None).await;
    let listed = h.engine.complaints.list(&fire).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, other.id);

    let fire_elsewhere = h.official("DEPT003", Role::Department, Some("641001")).await;
    assert!(h.engine.complaints.list(&fire_elsewhere).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lists_are_newest_first() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let first = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let second = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();

    let listed = h.engine.complaints.list(&citizen).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_missing_fields_reported_in_order() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;

    let missing = ComplaintSubmission {
        district: None,
        pincode: Some(" ".to_string()),
        ..pothole()
    };
    let err = h.engine.complaints.submit(&citizen, missing).await.unwrap_err();
    assert_eq!(err.to_string(), "District is required");

    let no_type = ComplaintSubmission {
        category: None,
        ..Default::default()
    };
    let err = h.engine.complaints.submit(&citizen, no_type).await.unwrap_err();
    assert_eq!(err.to_string(), "Type is required");

    assert_eq!(complaint::count_complaints(h.db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_submission_validation() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;

    let bad_category = ComplaintSubmission {
        category: Some("Aliens".to_string()),
        ..pothole()
    };
    assert!(matches!(
        h.engine.complaints.submit(&citizen, bad_category).await,
        Err(EngineError::Validation(_))
    ));

    let bad_pincode = ComplaintSubmission {
        pincode: Some("6000".to_string()),
        ..pothole()
    };
    assert!(matches!(
        h.engine.complaints.submit(&citizen, bad_pincode).await,
        Err(EngineError::Validation(_))
    ));

    let bad_phone = ComplaintSubmission {
        contact_phone: Some("12-34".to_string()),
        ..pothole()
    };
    assert!(matches!(
        h.engine.complaints.submit(&citizen, bad_phone).await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn test_reporter_snapshot_overrides() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h
        .engine
        .complaints
        .submit(
            &citizen,
            ComplaintSubmission {
                reporter_name: Some("R. Kumar".to_string()),
                contact_phone: Some("9123456789".to_string()),
                priority: Some(database::Priority::Urgent),
                ..pothole()
            },
        )
        .await
        .unwrap();
    assert_eq!(filed.reporter_name.as_deref(), Some("R. Kumar"));
    assert_eq!(filed.contact_phone.as_deref(), Some("9123456789"));
    assert_eq!(filed.priority, database::Priority::Urgent);
}

#[tokio::test]
async fn test_reference_codes_are_unique() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;

    let mut seen = HashSet::new();
    for _ in 0..25 {
        let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
        assert!(is_reference_code(&filed.reference_code));
        assert!(seen.insert(filed.reference_code));
    }
}

// ============================================================================
// Photos
// ============================================================================

#[tokio::test]
async fn test_malformed_photo_does_not_block_submission() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;

    let filed = h
        .engine
        .complaints
        .submit(
            &citizen,
            ComplaintSubmission {
                photo: Some("data:image/jpeg;base64,@@not-base64@@".to_string()),
                ..pothole()
            },
        )
        .await
        .unwrap();
    assert_eq!(filed.status, Status::Submitted);
    assert!(filed.photo_path.is_none());
    assert!(h.blobs.is_empty());
}

#[tokio::test]
async fn test_photos_stored_for_submission_and_resolution() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;

    let filed = h
        .engine
        .complaints
        .submit(
            &citizen,
            ComplaintSubmission {
                photo: Some("data:image/jpeg;base64,aGVsbG8=".to_string()),
                ..pothole()
            },
        )
        .await
        .unwrap();
    let photo = filed.photo_path.clone().unwrap();
    assert!(photo.starts_with(&format!("/static/uploads/{}_", filed.reference_code)));

    let works = h.works_officer().await;
    let update = StatusUpdate {
        resolved_coordinates: Some("13.0827,80.2707".to_string()),
        resolved_photo: Some("aGVsbG8=".to_string()),
        ..StatusUpdate::new(Status::Resolved)
    };
    let resolved = h
        .engine
        .complaints
        .update_status(&works, filed.id, update)
        .await
        .unwrap();
    let resolved_photo = resolved.resolved_photo_path.unwrap();
    assert!(resolved_photo.starts_with(&format!("/static/uploads/RES_{}_", filed.reference_code)));
    assert_eq!(resolved.resolved_coordinates.as_deref(), Some("13.0827,80.2707"));
    assert_eq!(resolved.photo_path.as_deref(), Some(photo.as_str()));
    assert_eq!(h.blobs.len(), 2);
}

// ============================================================================
// Status rules
// ============================================================================

#[tokio::test]
async fn test_status_never_moves_backwards() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let works = h.works_officer().await;

    let resolved = h.engine.complaints.resolve(&works, filed.id, None).await.unwrap();

    let back = h
        .engine
        .complaints
        .update_status(&works, filed.id, StatusUpdate::new(Status::InProgress))
        .await;
    assert!(matches!(
        back,
        Err(EngineError::InvalidTransition {
            from: Status::Resolved,
            to: Status::InProgress
        })
    ));

    let municipal = h.official("MUN001", Role::Municipal, None).await;
    let reforward = h
        .engine
        .complaints
        .forward(&municipal, filed.id, "Public Works")
        .await;
    assert!(matches!(reforward, Err(EngineError::InvalidTransition { .. })));

    let stored = complaint::get_complaint(h.db.pool(), filed.id).await.unwrap();
    assert_eq!(stored.status, Status::Resolved);
    assert_eq!(stored.resolved_at, resolved.resolved_at);
    assert_resolved_at_consistent(&stored);
}

#[tokio::test]
async fn test_update_status_rejects_submitted() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let works = h.works_officer().await;

    let result = h
        .engine
        .complaints
        .update_status(&works, filed.id, StatusUpdate::new(Status::Submitted))
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn test_same_rank_forward_is_allowed() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let municipal = h.official("MUN001", Role::Municipal, None).await;

    h.engine
        .complaints
        .forward(&municipal, filed.id, "Sanitation")
        .await
        .unwrap();
    let moved = h
        .engine
        .complaints
        .forward(&municipal, filed.id, "Public Works")
        .await
        .unwrap();
    assert_eq!(moved.forwarded_department.as_deref(), Some("Public Works"));

    let blank = h.engine.complaints.forward(&municipal, filed.id, "   ").await;
    assert!(matches!(blank, Err(EngineError::Validation(_))));
}

// ============================================================================
// Fake handling
// ============================================================================

#[tokio::test]
async fn test_department_mark_fake_closes_complaint() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let works = h.works_officer().await;

    let closed = h.engine.complaints.mark_fake(&works, filed.id, None).await.unwrap();
    assert!(closed.is_fake);
    assert_eq!(closed.status, Status::Resolved);
    assert_resolved_at_consistent(&closed);
    assert_eq!(
        closed.resolution_notes,
        Some(format!("{} {}", FAKE_MARKER, DEFAULT_FAKE_REASON))
    );

    let with_reason = h
        .engine
        .complaints
        .mark_fake(&works, filed.id, Some("Photo from the internet"))
        .await
        .unwrap();
    assert_eq!(
        with_reason.resolution_notes.as_deref(),
        Some("REPORTED AS FAKE: Photo from the internet")
    );
}

#[tokio::test]
async fn test_single_investigation_per_complaint() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let police = h.official("POLICE001", Role::Police, None).await;

    let blank = h.engine.complaints.report_fake(&police, filed.id, " ", None).await;
    assert!(matches!(blank, Err(EngineError::Validation(_))));

    let (flagged, _) = h
        .engine
        .complaints
        .report_fake(&police, filed.id, "duplicate", None)
        .await
        .unwrap();
    assert_eq!(flagged.status, Status::Submitted);

    let second = h
        .engine
        .complaints
        .report_fake(&police, filed.id, "still a duplicate", None)
        .await;
    assert!(matches!(second, Err(EngineError::Conflict(_))));

    // The failed report rolled back its complaint update too.
    let stored = complaint::get_complaint(h.db.pool(), filed.id).await.unwrap();
    assert_eq!(stored.version, flagged.version);

    // Only police see the investigation record.
    let mine = h.engine.complaints.detail(&citizen, filed.id).await.unwrap();
    assert!(mine.complaint.is_fake);
    assert!(mine.investigation.is_none());
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_stale_write_is_rejected() {
    let h = Harness::new().await;
    let citizen = h.citizen("9876543210").await;
    let filed = h.engine.complaints.submit(&citizen, pothole()).await.unwrap();
    let stale = complaint::get_complaint(h.db.pool(), filed.id).await.unwrap();

    let municipal = h.official("MUN001", Role::Municipal, None).await;
    h.engine
        .complaints
        .forward(&municipal, filed.id, "Public Works")
        .await
        .unwrap();

    let result = complaint::update_complaint(h.db.pool(), &stale).await;
    assert!(matches!(result, Err(database::DatabaseError::Conflict { .. })));

    let stored = complaint::get_complaint(h.db.pool(), filed.id).await.unwrap();
    assert_eq!(stored.status, Status::Assigned);
}

// ============================================================================
// Login flows
// ============================================================================

#[tokio::test]
async fn test_citizen_login_single_use() {
    let h = Harness::new().await;
    let issued = h.engine.otp.issue("9876543210").await.unwrap();

    let session = h
        .engine
        .citizen_login("9876543210", &issued.code)
        .await
        .unwrap();
    assert_eq!(session.role, Role::Citizen);
    assert_eq!(session.phone.as_deref(), Some("9876543210"));

    let replay = h.engine.citizen_login("9876543210", &issued.code).await;
    assert!(matches!(replay, Err(ref e) if e.is_authentication()));
}

#[tokio::test]
async fn test_official_login_errors_are_generic() {
    let h = Harness::new().await;
    let wrong_role = h
        .engine
        .official_login("DEPT001", DEMO_PASSWORD, Role::Police, None)
        .await
        .unwrap_err();
    let wrong_password = h
        .engine
        .official_login("DEPT001", "letmein", Role::Department, None)
        .await
        .unwrap_err();
    assert!(wrong_role.is_authentication());
    assert_eq!(wrong_role.to_string(), wrong_password.to_string());
}
