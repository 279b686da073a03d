//! One-time code storage.

use sqlx::{Executor, Sqlite};

use crate::error::Result;
use crate::models::OtpChallenge;

/// Create or replace the challenge for a phone.
pub async fn upsert_challenge<'e, E>(executor: E, challenge: &OtpChallenge) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO otp_challenges (phone, code, issued_at, expires_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(phone) DO UPDATE SET
            code = excluded.code,
            issued_at = excluded.issued_at,
            expires_at = excluded.expires_at
        "#,
    )
    .bind(&challenge.phone)
    .bind(&challenge.code)
    .bind(challenge.issued_at)
    .bind(challenge.expires_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Get the challenge matching both phone and code.
pub async fn find_challenge<'e, E>(
    executor: E,
    phone: &str,
    code: &str,
) -> Result<Option<OtpChallenge>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let record = sqlx::query_as::<_, OtpChallenge>(
        r#"
        SELECT phone, code, issued_at, expires_at
        FROM otp_challenges
        WHERE phone = ? AND code = ?
        "#,
    )
    .bind(phone)
    .bind(code)
    .fetch_optional(executor)
    .await?;

    Ok(record)
}

/// Delete the challenge for a phone.
///
/// Returns true if a challenge was deleted.
pub async fn delete_challenge<'e, E>(executor: E, phone: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM otp_challenges
        WHERE phone = ?
        "#,
    )
    .bind(phone)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
