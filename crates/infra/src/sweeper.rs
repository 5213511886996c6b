//! Background session-expiry sweeper.
//!
//! Expiry is already enforced lazily at request time; the sweeper exists so
//! abandoned sessions do not linger as active rows between requests.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::sessions::deactivate_expired_sessions;

/// Spawn a task that periodically deactivates expired session rows.
///
/// Errors are logged and the loop keeps running; a flaky database must not
/// kill the sweeper.
pub fn spawn_session_sweeper(pool: PgPool, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match deactivate_expired_sessions(&pool, chrono::Utc::now()).await {
                Ok(0) => {}
                Ok(swept) => tracing::info!(swept, "deactivated expired sessions"),
                Err(error) => tracing::warn!(%error, "session sweep failed"),
            }
        }
    })
}
