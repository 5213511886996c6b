//! Session rows: the server-side authority for revocation.
//!
//! A bearer token is only honored while its session row is active; either
//! side failing (bad signature, expired claim, revoked/expired row) rejects
//! the request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, Row};

use atelier_core::{SessionId, UserId};

#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub user_id: UserId,
    #[serde(skip_serializing)]
    pub token: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub active: bool,
}

fn session_from_row(row: &PgRow) -> SessionRecord {
    SessionRecord {
        id: SessionId::from_uuid(row.get("id")),
        user_id: UserId::new(row.get("user_id")),
        token: row.get("token"),
        ip: row.get("ip"),
        user_agent: row.get("user_agent"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
        last_activity_at: row.get("last_activity_at"),
        active: row.get("active"),
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_session(
    ex: impl PgExecutor<'_>,
    id: SessionId,
    user_id: UserId,
    token: &str,
    ip: Option<&str>,
    user_agent: Option<&str>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sessions
            (id, user_id, token, ip, user_agent, created_at, expires_at, last_activity_at, active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $6, TRUE)
        "#,
    )
    .bind(id.as_uuid())
    .bind(user_id.as_i64())
    .bind(token)
    .bind(ip)
    .bind(user_agent)
    .bind(created_at)
    .bind(expires_at)
    .execute(ex)
    .await?;
    Ok(())
}

/// Lookup by exact token value (the token is stored verbatim; a re-login
/// replaces it, revoking older bearers before their exp claim).
pub async fn find_session_by_token(
    ex: impl PgExecutor<'_>,
    token: &str,
) -> Result<Option<SessionRecord>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM sessions WHERE token = $1")
        .bind(token)
        .fetch_optional(ex)
        .await?;
    Ok(row.as_ref().map(session_from_row))
}

pub async fn deactivate_session(
    ex: impl PgExecutor<'_>,
    id: SessionId,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE sessions SET active = FALSE WHERE id = $1")
        .bind(id.as_uuid())
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Deactivate a user's active sessions, optionally sparing one (the caller's
/// own session on password change).
pub async fn deactivate_sessions_for_user(
    ex: impl PgExecutor<'_>,
    user_id: UserId,
    except: Option<SessionId>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET active = FALSE
        WHERE user_id = $1 AND active AND ($2::uuid IS NULL OR id <> $2)
        "#,
    )
    .bind(user_id.as_i64())
    .bind(except.map(|s| *s.as_uuid()))
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Refresh the activity timestamp. Best-effort at the call site: the gate
/// logs and continues if this fails.
pub async fn touch_session(
    ex: impl PgExecutor<'_>,
    id: SessionId,
    at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE sessions SET last_activity_at = $1 WHERE id = $2")
        .bind(at)
        .bind(id.as_uuid())
        .execute(ex)
        .await?;
    Ok(())
}

/// Deactivate rows whose expiration has passed, regardless of use.
/// Idempotent; safe to run concurrently with live traffic.
pub async fn deactivate_expired_sessions(
    ex: impl PgExecutor<'_>,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE sessions SET active = FALSE WHERE active AND expires_at <= $1")
        .bind(now)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}
