//! Complaint lifecycle and authorization.
//!
//! Every operation takes the caller's [`SessionContext`], checks the role
//! first, then loads the complaint, then applies the transition inside a
//! transaction. Status only moves forward:
//!
//! ```text
//! submitted -> assigned -> in_progress -> resolved
//! ```
//!
//! `is_fake` is an orthogonal flag. Department officers set it as a closing
//! action; police set it while opening an investigation record.

use chrono::{DateTime, Utc};
use database::validation::{
    require, validate_length, validate_one_of, validate_phone, validate_pincode,
    MAX_COORDINATES_LENGTH, MAX_DEPARTMENT_LENGTH, MAX_DISTRICT_LENGTH, MAX_LOCATION_LENGTH,
    MAX_NAME_LENGTH,
};
use database::{
    complaint, fake_investigation, user, Complaint, Database, DatabaseError, FakeInvestigation,
    NewComplaint, NewFakeInvestigation, Priority, Role, Status, Tx,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::COMPLAINT_CATEGORIES;
use crate::error::{EngineError, Result};
use crate::media::{AttachmentStage, MediaHandler};
use crate::reference::generate_reference_code;
use crate::session::SessionContext;
use crate::visibility::Visibility;

/// Marker placed before the reason when a department officer closes a
/// complaint as fake.
pub const FAKE_MARKER: &str = "REPORTED AS FAKE:";

/// Reason recorded when a department officer gives none.
pub const DEFAULT_FAKE_REASON: &str = "Marked as fake/spam by department officer";

const MAX_REFERENCE_ATTEMPTS: u32 = 5;

/// The fixed set of complaint transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Submit,
    Forward,
    Assign,
    StartWork,
    Resolve,
    UpdateStatus,
    MarkFake,
    ReportFake,
}

impl Transition {
    /// The only role allowed to perform the transition.
    pub fn actor(&self) -> Role {
        match self {
            Transition::Submit => Role::Citizen,
            Transition::Forward | Transition::Assign => Role::Municipal,
            Transition::StartWork
            | Transition::Resolve
            | Transition::UpdateStatus
            | Transition::MarkFake => Role::Department,
            Transition::ReportFake => Role::Police,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transition::Submit => "submit",
            Transition::Forward => "forward",
            Transition::Assign => "assign",
            Transition::StartWork => "start_work",
            Transition::Resolve => "resolve",
            Transition::UpdateStatus => "update_status",
            Transition::MarkFake => "mark_fake",
            Transition::ReportFake => "report_fake",
        }
    }
}

/// Fail with `InvalidTransition` if `to` ranks below `from`.
pub fn check_progression(from: Status, to: Status) -> Result<()> {
    if to.rank() < from.rank() {
        return Err(EngineError::InvalidTransition { from, to });
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn mark_resolved(complaint: &mut Complaint, now: DateTime<Utc>) {
    complaint.status = Status::Resolved;
    complaint.resolved_at.get_or_insert(now);
}

/// Fields a citizen supplies when filing a complaint.
#[derive(Debug, Clone, Default)]
pub struct ComplaintSubmission {
    /// Category, from [`COMPLAINT_CATEGORIES`].
    pub category: Option<String>,
    pub district: Option<String>,
    pub pincode: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub coordinates: Option<String>,
    /// Name to show on the complaint; defaults to the account name.
    pub reporter_name: Option<String>,
    /// Contact phone; defaults to the account phone.
    pub contact_phone: Option<String>,
    pub priority: Option<Priority>,
    /// Base64 photo, optionally a data URI.
    pub photo: Option<String>,
}

/// Department status update.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: Status,
    pub notes: Option<String>,
    pub resolved_coordinates: Option<String>,
    /// Base64 photo of the resolved site; only used when resolving.
    pub resolved_photo: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            notes: None,
            resolved_coordinates: None,
            resolved_photo: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A complaint together with its investigation record, when the caller may
/// see one.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintDetail {
    pub complaint: Complaint,
    pub investigation: Option<FakeInvestigation>,
}

/// Applies transitions and answers role-scoped reads.
#[derive(Clone)]
pub struct Lifecycle {
    db: Database,
    media: MediaHandler,
}

impl Lifecycle {
    pub fn new(db: Database, media: MediaHandler) -> Self {
        Self { db, media }
    }

    /// File a new complaint at status `submitted`.
    ///
    /// Required fields are checked in order type, district, pincode,
    /// location, description. A photo that cannot be stored is dropped and
    /// the complaint is still created.
    pub async fn submit(
        &self,
        session: &SessionContext,
        submission: ComplaintSubmission,
    ) -> Result<Complaint> {
        session.require_role(Transition::Submit.actor())?;

        let category = require("type", submission.category.as_deref())?;
        let district = require("district", submission.district.as_deref())?;
        let pincode = require("pincode", submission.pincode.as_deref())?;
        let location = require("location", submission.location.as_deref())?;
        let description = require("description", submission.description.as_deref())?;

        validate_one_of("type", category, COMPLAINT_CATEGORIES)?;
        validate_pincode(pincode)?;
        validate_length("district", district, MAX_DISTRICT_LENGTH)?;
        validate_length("location", location, MAX_LOCATION_LENGTH)?;

        let coordinates = non_blank(submission.coordinates.as_deref());
        if let Some(coordinates) = &coordinates {
            validate_length("coordinates", coordinates, MAX_COORDINATES_LENGTH)?;
        }
        let reporter_name = non_blank(submission.reporter_name.as_deref());
        if let Some(name) = &reporter_name {
            validate_length("name", name, MAX_NAME_LENGTH)?;
        }
        let contact_phone = non_blank(submission.contact_phone.as_deref());
        if let Some(phone) = &contact_phone {
            validate_phone(phone)?;
        }

        let reporter = user::get_user(self.db.pool(), session.user_id).await?;

        let now = Utc::now();
        let new = NewComplaint {
            reference_code: generate_reference_code(now),
            reporter_id: reporter.id,
            reporter_name: reporter_name.or(Some(reporter.name)),
            contact_phone: contact_phone.or(reporter.phone),
            category: category.to_string(),
            description: description.to_string(),
            district: district.to_string(),
            pincode: pincode.to_string(),
            location: location.to_string(),
            coordinates,
            priority: submission.priority.unwrap_or_default(),
            photo_path: None,
            created_at: now,
        };

        let created = self
            .create_with_photo(new, submission.photo.as_deref(), || {
                generate_reference_code(now)
            })
            .await?;

        info!(
            complaint_id = %created.reference_code,
            reporter_id = created.reporter_id,
            category = %created.category,
            pincode = %created.pincode,
            has_photo = created.photo_path.is_some(),
            "Complaint submitted"
        );
        Ok(created)
    }

    /// Insert a complaint, drawing a fresh reference code on collision, then
    /// store its photo under the code that was kept.
    async fn create_with_photo<F>(
        &self,
        mut new: NewComplaint,
        photo: Option<&str>,
        mut next_code: F,
    ) -> Result<Complaint>
    where
        F: FnMut() -> String,
    {
        let mut tx = self.db.begin().await?;

        let mut attempt = 1;
        let mut created = loop {
            match complaint::create_complaint(&mut *tx, &new).await {
                Ok(created) => break created,
                Err(DatabaseError::AlreadyExists { .. }) if attempt < MAX_REFERENCE_ATTEMPTS => {
                    debug!(complaint_id = %new.reference_code, attempt, "Reference code collision, retrying");
                    attempt += 1;
                    new.reference_code = next_code();
                }
                Err(err) => return Err(err.into()),
            }
        };

        if let Some(path) = self
            .media
            .attach_optional(photo, &created.reference_code, AttachmentStage::Submission)
            .await
        {
            created.photo_path = Some(path);
            created = complaint::update_complaint(&mut *tx, &created).await?;
        }

        Database::commit(tx).await?;
        Ok(created)
    }

    /// Route a complaint to a department. Status becomes `assigned`.
    pub async fn forward(
        &self,
        session: &SessionContext,
        id: i64,
        department: &str,
    ) -> Result<Complaint> {
        session.require_role(Transition::Forward.actor())?;
        let department = non_blank(Some(department))
            .ok_or_else(|| EngineError::validation("Please select a department"))?;
        validate_length("department", &department, MAX_DEPARTMENT_LENGTH)?;
        let officer = session.user_id;

        self.apply(session, id, Transition::Forward, move |c, _| {
            check_progression(c.status, Status::Assigned)?;
            c.status = Status::Assigned;
            c.forwarded_department = Some(department);
            c.verified_by = Some(officer);
            Ok(())
        })
        .await
    }

    /// Assign a complaint to a department officer. Status becomes `assigned`.
    pub async fn assign(
        &self,
        session: &SessionContext,
        id: i64,
        officer_id: i64,
    ) -> Result<Complaint> {
        session.require_role(Transition::Assign.actor())?;

        let mut tx = self.db.begin().await?;
        let mut c = complaint::get_complaint(&mut *tx, id).await?;

        let officer = user::get_user(&mut *tx, officer_id).await?;
        if officer.role != Role::Department {
            return Err(EngineError::validation(
                "Complaints can only be assigned to department officers",
            ));
        }

        check_progression(c.status, Status::Assigned)?;
        c.status = Status::Assigned;
        c.assigned_to = Some(officer.id);

        self.save(tx, &c, Transition::Assign, session).await
    }

    /// Status becomes `in_progress`.
    pub async fn start_work(&self, session: &SessionContext, id: i64) -> Result<Complaint> {
        session.require_role(Transition::StartWork.actor())?;
        self.apply(session, id, Transition::StartWork, |c, _| {
            check_progression(c.status, Status::InProgress)?;
            c.status = Status::InProgress;
            Ok(())
        })
        .await
    }

    /// Close a complaint with optional notes.
    pub async fn resolve(
        &self,
        session: &SessionContext,
        id: i64,
        notes: Option<&str>,
    ) -> Result<Complaint> {
        session.require_role(Transition::Resolve.actor())?;
        let notes = non_blank(notes);

        self.apply(session, id, Transition::Resolve, move |c, now| {
            mark_resolved(c, now);
            if notes.is_some() {
                c.resolution_notes = notes;
            }
            Ok(())
        })
        .await
    }

    /// Set the status to `assigned`, `in_progress` or `resolved`.
    ///
    /// Resolving also records the resolved coordinates and stores the optional
    /// resolved-site photo.
    pub async fn update_status(
        &self,
        session: &SessionContext,
        id: i64,
        update: StatusUpdate,
    ) -> Result<Complaint> {
        session.require_role(Transition::UpdateStatus.actor())?;

        let target = update.status;
        if target == Status::Submitted {
            return Err(EngineError::validation("Invalid status"));
        }
        let notes = non_blank(update.notes.as_deref());
        let resolved_coordinates = non_blank(update.resolved_coordinates.as_deref());
        if let Some(coordinates) = &resolved_coordinates {
            validate_length("resolved_coordinates", coordinates, MAX_COORDINATES_LENGTH)?;
        }

        // Store the photo before the transaction; a failed store only drops it.
        let resolved_photo = if target == Status::Resolved {
            let current = complaint::get_complaint(self.db.pool(), id).await?;
            check_progression(current.status, target)?;
            self.media
                .attach_optional(
                    update.resolved_photo.as_deref(),
                    &current.reference_code,
                    AttachmentStage::Resolution,
                )
                .await
        } else {
            None
        };

        self.apply(session, id, Transition::UpdateStatus, move |c, now| {
            check_progression(c.status, target)?;
            if target == Status::Resolved {
                mark_resolved(c, now);
                if resolved_coordinates.is_some() {
                    c.resolved_coordinates = resolved_coordinates;
                }
                if resolved_photo.is_some() {
                    c.resolved_photo_path = resolved_photo;
                }
            } else {
                c.status = target;
            }
            if notes.is_some() {
                c.resolution_notes = notes;
            }
            Ok(())
        })
        .await
    }

    /// Department closure of a complaint judged fake.
    pub async fn mark_fake(
        &self,
        session: &SessionContext,
        id: i64,
        reason: Option<&str>,
    ) -> Result<Complaint> {
        session.require_role(Transition::MarkFake.actor())?;
        let reason = non_blank(reason).unwrap_or_else(|| DEFAULT_FAKE_REASON.to_string());

        self.apply(session, id, Transition::MarkFake, move |c, now| {
            c.is_fake = true;
            mark_resolved(c, now);
            c.resolution_notes = Some(format!("{} {}", FAKE_MARKER, reason));
            Ok(())
        })
        .await
    }

    /// Police flag a complaint as fake and open an investigation.
    ///
    /// Status is left untouched. A complaint holds at most one investigation.
    pub async fn report_fake(
        &self,
        session: &SessionContext,
        id: i64,
        reason: &str,
        evidence: Option<&str>,
    ) -> Result<(Complaint, FakeInvestigation)> {
        session.require_role(Transition::ReportFake.actor())?;
        let reason = require("reason", Some(reason))?.to_string();
        let evidence = non_blank(evidence);

        let mut tx = self.db.begin().await?;
        let mut c = complaint::get_complaint(&mut *tx, id).await?;
        c.is_fake = true;
        let updated = complaint::update_complaint(&mut *tx, &c).await?;

        let investigation = fake_investigation::create_investigation(
            &mut *tx,
            &NewFakeInvestigation {
                complaint_id: updated.id,
                investigated_by: session.user_id,
                reason,
                evidence,
                created_at: Utc::now(),
            },
        )
        .await
        .map_err(|err| match err {
            DatabaseError::AlreadyExists { .. } => {
                EngineError::Conflict("Complaint is already under investigation".to_string())
            }
            other => other.into(),
        })?;

        Database::commit(tx).await?;

        info!(
            complaint_id = %updated.reference_code,
            transition = Transition::ReportFake.name(),
            actor = session.user_id,
            investigation_id = investigation.id,
            "Complaint reported as fake"
        );
        Ok((updated, investigation))
    }

    /// Complaints visible to the session, newest first.
    pub async fn list(&self, session: &SessionContext) -> Result<Vec<Complaint>> {
        match Visibility::for_session(session) {
            Visibility::Nothing => {
                debug!(user_id = session.user_id, role = %session.role, "Session sees no complaints");
                Ok(Vec::new())
            }
            Visibility::Filtered(filter) => {
                Ok(complaint::list_complaints(self.db.pool(), &filter).await?)
            }
        }
    }

    /// A single complaint, if visible to the session.
    ///
    /// Complaints outside the caller's scope are reported as not found. The
    /// investigation record is only included for police.
    pub async fn detail(&self, session: &SessionContext, id: i64) -> Result<ComplaintDetail> {
        let c = complaint::get_complaint(self.db.pool(), id).await?;
        if !Visibility::for_session(session).permits(&c) {
            return Err(EngineError::NotFound {
                entity: "Complaint",
                id: id.to_string(),
            });
        }

        let investigation = if session.role == Role::Police {
            fake_investigation::get_for_complaint(self.db.pool(), c.id).await?
        } else {
            None
        };

        Ok(ComplaintDetail {
            complaint: c,
            investigation,
        })
    }

    async fn apply<F>(
        &self,
        session: &SessionContext,
        id: i64,
        transition: Transition,
        mutate: F,
    ) -> Result<Complaint>
    where
        F: FnOnce(&mut Complaint, DateTime<Utc>) -> Result<()>,
    {
        let mut tx = self.db.begin().await?;
        let mut c = complaint::get_complaint(&mut *tx, id).await?;
        mutate(&mut c, Utc::now())?;
        self.save(tx, &c, transition, session).await
    }

    async fn save(
        &self,
        mut tx: Tx,
        c: &Complaint,
        transition: Transition,
        session: &SessionContext,
    ) -> Result<Complaint> {
        let updated = complaint::update_complaint(&mut *tx, c).await?;
        Database::commit(tx).await?;

        info!(
            complaint_id = %updated.reference_code,
            transition = transition.name(),
            actor = session.user_id,
            status = %updated.status,
            "Complaint updated"
        );
        Ok(updated)
    }
}
