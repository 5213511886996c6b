//! Login-attempt audit log. Append-only; never mutated or deleted here.
//!
//! Lockout thresholds exist in configuration elsewhere in the product but
//! have no enforcement path in this flow; attempts are recorded and nothing
//! is counted against the user.

use sqlx::PgExecutor;

use atelier_core::UserId;

pub const REASON_USER_NOT_FOUND: &str = "user not found";
pub const REASON_BAD_PASSWORD: &str = "bad password";

pub async fn record_login_attempt(
    ex: impl PgExecutor<'_>,
    identifier: &str,
    ip: Option<&str>,
    user_agent: Option<&str>,
    success: bool,
    failure_reason: Option<&str>,
    user_id: Option<UserId>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO login_attempts
            (identifier, ip, user_agent, success, failure_reason, user_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#,
    )
    .bind(identifier)
    .bind(ip)
    .bind(user_agent)
    .bind(success)
    .bind(failure_reason)
    .bind(user_id.map(|u| u.as_i64()))
    .execute(ex)
    .await?;
    Ok(())
}
