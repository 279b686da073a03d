//! User storage and credential lookups.

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::error::{DatabaseError, Result};
use crate::models::{NewUser, Role, User};

const USER_COLUMNS: &str = "id, phone, external_id, password_hash, role, name, department, \
                            pincode, statewide_access, created_at";

/// Create a new user.
pub async fn create_user<'e, E>(executor: E, user: &NewUser) -> Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!(
        r#"
        INSERT INTO users (phone, external_id, password_hash, role, name, department,
                           pincode, statewide_access, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    );

    let identity = user
        .phone
        .clone()
        .or_else(|| user.external_id.clone())
        .unwrap_or_default();

    sqlx::query_as::<_, User>(&query)
        .bind(&user.phone)
        .bind(&user.external_id)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.name)
        .bind(&user.department)
        .bind(&user.pincode)
        .bind(user.statewide_access)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
        .map_err(|e| DatabaseError::on_unique(e, "User", identity))
}

/// Get a user by ID.
pub async fn get_user<'e, E>(executor: E, id: i64) -> Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        })
}

/// Find the user registered with a phone number.
pub async fn find_by_phone<'e, E>(executor: E, phone: &str) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE phone = ?");

    let user = sqlx::query_as::<_, User>(&query)
        .bind(phone)
        .fetch_optional(executor)
        .await?;

    Ok(user)
}

/// Find an official by external id. The role must match exactly.
pub async fn find_by_external_id<'e, E>(
    executor: E,
    external_id: &str,
    role: Role,
) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ? AND role = ?");

    let user = sqlx::query_as::<_, User>(&query)
        .bind(external_id)
        .bind(role)
        .fetch_optional(executor)
        .await?;

    Ok(user)
}

/// Count total users.
pub async fn count_users<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(executor)
    .await?;

    Ok(count)
}
