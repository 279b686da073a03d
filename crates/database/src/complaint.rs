//! Complaint storage.

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::error::{DatabaseError, Result};
use crate::models::{Complaint, NewComplaint, Status};

const COMPLAINT_COLUMNS: &str = "id, reference_code, reporter_id, reporter_name, contact_phone, \
    category, description, district, pincode, location, coordinates, status, priority, \
    photo_path, resolved_photo_path, resolved_coordinates, forwarded_department, assigned_to, \
    verified_by, is_fake, resolution_notes, version, created_at, updated_at, resolved_at";

/// Row filter for complaint listings.
///
/// Every populated field narrows the result; an empty filter matches all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub reporter_id: Option<i64>,
    pub pincode: Option<String>,
    pub forwarded_department: Option<String>,
    pub fake_only: bool,
    pub statuses: Option<Vec<Status>>,
}

impl ComplaintFilter {
    /// Check a loaded complaint against the filter.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        if let Some(reporter_id) = self.reporter_id {
            if complaint.reporter_id != reporter_id {
                return false;
            }
        }
        if let Some(pincode) = &self.pincode {
            if &complaint.pincode != pincode {
                return false;
            }
        }
        if let Some(department) = &self.forwarded_department {
            if complaint.forwarded_department.as_ref() != Some(department) {
                return false;
            }
        }
        if self.fake_only && !complaint.is_fake {
            return false;
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&complaint.status) {
                return false;
            }
        }
        true
    }
}

/// Insert a new complaint at status `submitted`.
pub async fn create_complaint<'e, E>(executor: E, complaint: &NewComplaint) -> Result<Complaint>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!(
        r#"
        INSERT INTO complaints (reference_code, reporter_id, reporter_name, contact_phone,
                                category, description, district, pincode, location,
                                coordinates, status, priority, photo_path,
                                created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {COMPLAINT_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Complaint>(&query)
        .bind(&complaint.reference_code)
        .bind(complaint.reporter_id)
        .bind(&complaint.reporter_name)
        .bind(&complaint.contact_phone)
        .bind(&complaint.category)
        .bind(&complaint.description)
        .bind(&complaint.district)
        .bind(&complaint.pincode)
        .bind(&complaint.location)
        .bind(&complaint.coordinates)
        .bind(Status::Submitted)
        .bind(complaint.priority)
        .bind(&complaint.photo_path)
        .bind(complaint.created_at)
        .bind(complaint.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| DatabaseError::on_unique(e, "Complaint", complaint.reference_code.clone()))
}

/// Get a complaint by internal ID.
pub async fn get_complaint<'e, E>(executor: E, id: i64) -> Result<Complaint>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?");

    sqlx::query_as::<_, Complaint>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Complaint",
            id: id.to_string(),
        })
}

/// Write back the mutable fields of a complaint.
///
/// The write only applies if the stored version still equals `complaint.version`;
/// otherwise `Conflict` is returned. `updated_at` is touched and the version bumped.
pub async fn update_complaint<'e, E>(executor: E, complaint: &Complaint) -> Result<Complaint>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!(
        r#"
        UPDATE complaints
        SET status = ?,
            priority = ?,
            photo_path = ?,
            resolved_photo_path = ?,
            resolved_coordinates = ?,
            forwarded_department = ?,
            assigned_to = ?,
            verified_by = ?,
            is_fake = ?,
            resolution_notes = ?,
            resolved_at = ?,
            updated_at = ?,
            version = version + 1
        WHERE id = ? AND version = ?
        RETURNING {COMPLAINT_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Complaint>(&query)
        .bind(complaint.status)
        .bind(complaint.priority)
        .bind(&complaint.photo_path)
        .bind(&complaint.resolved_photo_path)
        .bind(&complaint.resolved_coordinates)
        .bind(&complaint.forwarded_department)
        .bind(complaint.assigned_to)
        .bind(complaint.verified_by)
        .bind(complaint.is_fake)
        .bind(&complaint.resolution_notes)
        .bind(complaint.resolved_at)
        .bind(Utc::now())
        .bind(complaint.id)
        .bind(complaint.version)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| DatabaseError::Conflict {
            entity: "Complaint",
            id: complaint.reference_code.clone(),
        })
}

/// List complaints matching a filter, newest first.
pub async fn list_complaints<'e, E>(executor: E, filter: &ComplaintFilter) -> Result<Vec<Complaint>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE 1 = 1"));

    if let Some(reporter_id) = filter.reporter_id {
        builder.push(" AND reporter_id = ").push_bind(reporter_id);
    }
    if let Some(pincode) = &filter.pincode {
        builder.push(" AND pincode = ").push_bind(pincode.clone());
    }
    if let Some(department) = &filter.forwarded_department {
        builder
            .push(" AND forwarded_department = ")
            .push_bind(department.clone());
    }
    if filter.fake_only {
        builder.push(" AND is_fake = 1");
    }
    if let Some(statuses) = &filter.statuses {
        if statuses.is_empty() {
            builder.push(" AND 0");
        } else {
            builder.push(" AND status IN (");
            let mut separated = builder.separated(", ");
            for status in statuses {
                separated.push_bind(*status);
            }
            separated.push_unseparated(")");
        }
    }
    builder.push(" ORDER BY id DESC");

    let complaints = builder
        .build_query_as::<Complaint>()
        .fetch_all(executor)
        .await?;

    Ok(complaints)
}

/// Count total complaints.
pub async fn count_complaints<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM complaints
        "#,
    )
    .fetch_one(executor)
    .await?;

    Ok(count)
}
