//! User rows and credential-store queries.
//!
//! Functions take `impl PgExecutor` so the same query runs against the pool
//! or inside a caller-owned transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, Row};

use atelier_auth::Role;
use atelier_core::UserId;

/// Full user row, including the password hash. Never serialized; strip to
/// [`PublicUser`] before returning through the API boundary.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role_id: i64,
    pub role: Role,
    pub active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn into_public(self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            role: self.role,
            active: self.active,
            last_login_at: self.last_login_at,
        }
    }
}

/// User view with the password hash stripped.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

fn user_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: UserId::new(row.get("id")),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        full_name: row.get("full_name"),
        role_id: row.get("role_id"),
        role: Role::new(row.get::<String, _>("role_name")),
        active: row.get("active"),
        last_login_at: row.get("last_login_at"),
    }
}

const USER_COLUMNS: &str =
    "u.id, u.username, u.email, u.password_hash, u.full_name, u.role_id, \
     u.active, u.last_login_at, r.name AS role_name";

/// Resolve a user by email first, then by username (one round-trip).
pub async fn find_user_by_identifier(
    ex: impl PgExecutor<'_>,
    identifier: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users u
        JOIN roles r ON r.id = u.role_id
        WHERE u.email = $1 OR u.username = $1
        ORDER BY (u.email = $1) DESC
        LIMIT 1
        "#
    ))
    .bind(identifier)
    .fetch_optional(ex)
    .await?;
    Ok(row.as_ref().map(user_from_row))
}

pub async fn find_user_by_id(
    ex: impl PgExecutor<'_>,
    user_id: UserId,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users u
        JOIN roles r ON r.id = u.role_id
        WHERE u.id = $1
        "#
    ))
    .bind(user_id.as_i64())
    .fetch_optional(ex)
    .await?;
    Ok(row.as_ref().map(user_from_row))
}

pub async fn update_last_login(
    ex: impl PgExecutor<'_>,
    user_id: UserId,
    at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
        .bind(at)
        .bind(user_id.as_i64())
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn update_password_hash(
    ex: impl PgExecutor<'_>,
    user_id: UserId,
    hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(hash)
        .bind(user_id.as_i64())
        .execute(ex)
        .await?;
    Ok(())
}

/// Grant-table names for a user: union of role grants and direct grants.
/// Unknown names are filtered later by `PermissionSet::from_names`.
pub async fn resolve_permission_names(
    ex: impl PgExecutor<'_>,
    role_id: i64,
    user_id: UserId,
) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT p.name
        FROM permissions p
        JOIN role_permissions rp ON rp.permission_id = p.id
        WHERE rp.role_id = $1
        UNION
        SELECT p.name
        FROM permissions p
        JOIN user_permissions up ON up.permission_id = p.id
        WHERE up.user_id = $2
        "#,
    )
    .bind(role_id)
    .bind(user_id.as_i64())
    .fetch_all(ex)
    .await?;
    Ok(rows.iter().map(|r| r.get("name")).collect())
}

pub async fn insert_user(
    ex: impl PgExecutor<'_>,
    username: &str,
    email: &str,
    password_hash: &str,
    full_name: &str,
    role_id: i64,
) -> Result<UserId, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, full_name, role_id, active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role_id)
    .fetch_one(ex)
    .await?;
    Ok(UserId::new(row.get("id")))
}

/// Returns the number of rows touched (0 means unknown user).
pub async fn set_user_active(
    ex: impl PgExecutor<'_>,
    user_id: UserId,
    active: bool,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET active = $1 WHERE id = $2")
        .bind(active)
        .bind(user_id.as_i64())
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}
