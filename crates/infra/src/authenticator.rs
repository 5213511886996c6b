//! Credential verification and session lifecycle orchestration.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use atelier_auth::{
    hash_password, verify_password, PermissionSet, TokenSigner, MIN_PASSWORD_LEN,
};
use atelier_core::{DomainError, SessionId, UserId};

use crate::error::{is_unique_violation, InfraError};
use crate::login_attempts::{
    record_login_attempt, REASON_BAD_PASSWORD, REASON_USER_NOT_FOUND,
};
use crate::users::PublicUser;
use crate::{sessions, users};

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub user: PublicUser,
    pub token: String,
    pub session_id: SessionId,
    pub expires_at: DateTime<Utc>,
}

/// Input for admin user creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role_id: i64,
}

/// Validates credentials, issues tokens, and enforces the
/// single-active-session-per-user policy.
#[derive(Clone)]
pub struct Authenticator {
    pool: PgPool,
    signer: TokenSigner,
}

impl Authenticator {
    pub fn new(pool: PgPool, signer: TokenSigner) -> Self {
        Self { pool, signer }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Authenticate and open a session.
    ///
    /// On success the user's prior active sessions are deactivated, the
    /// last-login timestamp is updated, the effective permission set is
    /// resolved and snapshotted into a signed token, and a new session row
    /// is persisted, all in one transaction. Attempt audit rows are written
    /// outside it (append-only, kept even when the login fails).
    #[instrument(skip(self, password), fields(identifier = %identifier), err)]
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<LoginOutcome, InfraError> {
        let Some(user) = users::find_user_by_identifier(&self.pool, identifier).await? else {
            record_login_attempt(
                &self.pool,
                identifier,
                ip,
                user_agent,
                false,
                Some(REASON_USER_NOT_FOUND),
                None,
            )
            .await?;
            return Err(DomainError::InvalidCredentials.into());
        };

        if !user.active {
            tracing::info!(user_id = %user.id, "login rejected: account disabled");
            return Err(DomainError::AccountDisabled.into());
        }

        if !verify_password(password, &user.password_hash) {
            record_login_attempt(
                &self.pool,
                identifier,
                ip,
                user_agent,
                false,
                Some(REASON_BAD_PASSWORD),
                Some(user.id),
            )
            .await?;
            return Err(DomainError::InvalidCredentials.into());
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Single-session policy: a new login supersedes everything prior.
        sessions::deactivate_sessions_for_user(&mut *tx, user.id, None).await?;
        users::update_last_login(&mut *tx, user.id, now).await?;

        let permissions = if user.role.is_admin() {
            PermissionSet::all()
        } else {
            let names =
                users::resolve_permission_names(&mut *tx, user.role_id, user.id).await?;
            PermissionSet::from_names(names.iter().map(String::as_str))
        };

        let (token, expires_at) = self
            .signer
            .sign(
                user.id,
                &user.username,
                &user.email,
                user.role.clone(),
                permissions,
                now,
            )
            .map_err(|_| InfraError::Token)?;

        let session_id = SessionId::new();
        sessions::insert_session(
            &mut *tx, session_id, user.id, &token, ip, user_agent, now, expires_at,
        )
        .await?;

        tx.commit().await?;

        record_login_attempt(
            &self.pool,
            identifier,
            ip,
            user_agent,
            true,
            None,
            Some(user.id),
        )
        .await?;

        Ok(LoginOutcome {
            user: user.into_public(),
            token,
            session_id,
            expires_at,
        })
    }

    /// Deactivate a single session.
    #[instrument(skip(self), err)]
    pub async fn logout(&self, session_id: SessionId) -> Result<(), InfraError> {
        sessions::deactivate_session(&self.pool, session_id).await?;
        Ok(())
    }

    /// Change a password, revoking every *other* active session.
    ///
    /// The caller's own session (identified by `current_session`) survives.
    #[instrument(skip(self, old_password, new_password), err)]
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_session: SessionId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), InfraError> {
        let user = users::find_user_by_id(&self.pool, user_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        if !verify_password(old_password, &user.password_hash) {
            return Err(DomainError::InvalidCredentials.into());
        }
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }

        let hash = hash_password(new_password)?;

        let mut tx = self.pool.begin().await?;
        users::update_password_hash(&mut *tx, user_id, &hash).await?;
        let revoked =
            sessions::deactivate_sessions_for_user(&mut *tx, user_id, Some(current_session))
                .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user_id, revoked, "password changed, sibling sessions revoked");
        Ok(())
    }

    /// Admin: create a user. Duplicate username/email surfaces as Conflict.
    #[instrument(skip(self, new_user), fields(username = %new_user.username), err)]
    pub async fn create_user(&self, new_user: NewUser) -> Result<PublicUser, InfraError> {
        if new_user.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }
        if new_user.username.trim().is_empty() || !new_user.email.contains('@') {
            return Err(DomainError::validation("username and a valid email are required").into());
        }

        let hash = hash_password(&new_user.password)?;
        let user_id = users::insert_user(
            &self.pool,
            new_user.username.trim(),
            &new_user.email.trim().to_lowercase(),
            &hash,
            new_user.full_name.trim(),
            new_user.role_id,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InfraError::Domain(DomainError::conflict("username or email already exists"))
            } else {
                e.into()
            }
        })?;

        let user = users::find_user_by_id(&self.pool, user_id)
            .await?
            .ok_or(DomainError::NotFound)?;
        Ok(user.into_public())
    }

    /// Admin: activate or deactivate an account.
    #[instrument(skip(self), err)]
    pub async fn set_user_active(
        &self,
        user_id: UserId,
        active: bool,
    ) -> Result<(), InfraError> {
        let touched = users::set_user_active(&self.pool, user_id, active).await?;
        if touched == 0 {
            return Err(DomainError::NotFound.into());
        }
        Ok(())
    }
}
