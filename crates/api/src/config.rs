//! Process configuration from environment variables.
//!
//! Missing values warn and fall back to dev defaults, except the database
//! URL, which has no sane default.

use std::time::Duration;

use atelier_auth::parse_expiry;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime; also the session row's expiration window.
    pub token_expiry: chrono::Duration,
    pub session_sweep: Duration,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let token_expiry = parse_expiry(&std::env::var("TOKEN_EXPIRY").unwrap_or_default());

        let session_sweep = std::env::var("SESSION_SWEEP_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(300));

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            token_expiry,
            session_sweep,
            bind_addr,
        })
    }
}
