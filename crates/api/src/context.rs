use atelier_auth::AuthClaims;
use atelier_infra::SessionRecord;

/// Authenticated request context, attached by the session gate.
///
/// Carries both the verified token claims (identity + permission snapshot)
/// and the backing session row; handlers that revoke or spare the caller's
/// own session need its id.
#[derive(Debug, Clone)]
pub struct AuthContext {
    claims: AuthClaims,
    session: SessionRecord,
}

impl AuthContext {
    pub fn new(claims: AuthClaims, session: SessionRecord) -> Self {
        Self { claims, session }
    }

    pub fn claims(&self) -> &AuthClaims {
        &self.claims
    }

    pub fn session(&self) -> &SessionRecord {
        &self.session
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }
}
