//! Police fake-investigation records.

use sqlx::{Executor, Sqlite};

use crate::error::{DatabaseError, Result};
use crate::models::{FakeInvestigation, NewFakeInvestigation};

/// Record an investigation. At most one exists per complaint.
pub async fn create_investigation<'e, E>(
    executor: E,
    investigation: &NewFakeInvestigation,
) -> Result<FakeInvestigation>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, FakeInvestigation>(
        r#"
        INSERT INTO fake_investigations (complaint_id, investigated_by, reason, evidence, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, complaint_id, investigated_by, reason, evidence, created_at
        "#,
    )
    .bind(investigation.complaint_id)
    .bind(investigation.investigated_by)
    .bind(&investigation.reason)
    .bind(&investigation.evidence)
    .bind(investigation.created_at)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        DatabaseError::on_unique(
            e,
            "FakeInvestigation",
            investigation.complaint_id.to_string(),
        )
    })
}

/// Get the investigation attached to a complaint, if any.
pub async fn get_for_complaint<'e, E>(
    executor: E,
    complaint_id: i64,
) -> Result<Option<FakeInvestigation>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let record = sqlx::query_as::<_, FakeInvestigation>(
        r#"
        SELECT id, complaint_id, investigated_by, reason, evidence, created_at
        FROM fake_investigations
        WHERE complaint_id = ?
        "#,
    )
    .bind(complaint_id)
    .fetch_optional(executor)
    .await?;

    Ok(record)
}
