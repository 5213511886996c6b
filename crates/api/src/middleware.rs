//! Session gate.
//!
//! A request is authenticated only when the signed token AND its backing
//! session row both check out. The checks run in a fixed order so each
//! failure mode surfaces as its own error:
//!
//! 1. missing/malformed bearer        -> Unauthenticated
//! 2. bad signature/structure         -> InvalidToken
//! 3. token's own exp claim passed    -> TokenExpired
//! 4. session row missing or revoked  -> SessionRevoked
//! 5. account deactivated             -> AccountDisabled
//! 6. stored expiration passed        -> SessionExpired (row deactivated)

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use atelier_auth::TokenError;
use atelier_core::DomainError;
use atelier_infra::{sessions, users, InfraError};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub services: Arc<AppServices>,
}

/// Blocking gate: rejects the request unless the full check chain passes.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match authenticate(&state.services, req.headers()).await {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(e) => errors::infra_error_response(&e),
    }
}

/// Non-blocking variant: attaches a context when the chain passes, proceeds
/// unauthenticated otherwise. Handlers behind it treat a missing
/// [`AuthContext`] extension as an anonymous caller.
pub async fn optional_auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Ok(ctx) = authenticate(&state.services, req.headers()).await {
        req.extensions_mut().insert(ctx);
    }
    next.run(req).await
}

async fn authenticate(
    services: &AppServices,
    headers: &HeaderMap,
) -> Result<AuthContext, InfraError> {
    let token = extract_bearer(headers).ok_or(DomainError::Unauthenticated)?;

    let claims = services
        .authenticator()
        .signer()
        .verify(token)
        .map_err(|e| match e {
            TokenError::Expired => DomainError::TokenExpired,
            TokenError::Invalid => DomainError::InvalidToken,
        })?;

    let pool = services.pool();

    let session = sessions::find_session_by_token(pool, token)
        .await?
        .filter(|s| s.active)
        .ok_or(DomainError::SessionRevoked)?;

    let user = users::find_user_by_id(pool, claims.sub)
        .await?
        .ok_or(DomainError::SessionRevoked)?;
    if !user.active {
        return Err(DomainError::AccountDisabled.into());
    }

    let now = Utc::now();
    if session.expires_at <= now {
        sessions::deactivate_session(pool, session.id).await?;
        return Err(DomainError::SessionExpired.into());
    }

    // Best-effort activity refresh; a failure here must not fail the request.
    if let Err(error) = sessions::touch_session(pool, session.id, now).await {
        tracing::warn!(session_id = %session.id, %error, "failed to refresh session activity");
    }

    Ok(AuthContext::new(claims, session))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn bearer_extraction_requires_scheme_and_token() {
        assert_eq!(extract_bearer(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&headers_with("Bearer   spaced  ")), Some("spaced"));
        assert_eq!(extract_bearer(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer(&headers_with("Basic abc")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }
}
