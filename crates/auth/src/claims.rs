use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::UserId;

use crate::{PermissionSet, Role};

/// Token claims model (transport-agnostic).
///
/// This is the point-in-time identity snapshot embedded at login: who the
/// user is, their role, and their effective permission set. Permissions are
/// not re-queried per request; re-login picks up grant changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject: the user id.
    pub sub: UserId,

    pub username: String,

    pub email: String,

    pub role: Role,

    /// Effective permission set resolved at login.
    pub permissions: PermissionSet,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiration (unix seconds). Also enforced by the verifier.
    pub exp: i64,
}

impl AuthClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token's own expiry claim has passed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Permission;

    fn claims(exp: i64) -> AuthClaims {
        AuthClaims {
            sub: UserId::new(1),
            username: "amine".into(),
            email: "amine@example.com".into(),
            role: Role::new("operator"),
            permissions: [Permission::StockRead].into_iter().collect(),
            iat: 0,
            exp,
        }
    }

    #[test]
    fn expiry_check_is_inclusive_of_the_boundary() {
        let now = Utc::now();
        assert!(claims(now.timestamp()).is_expired(now));
        assert!(claims(now.timestamp() - 1).is_expired(now));
        assert!(!claims(now.timestamp() + 60).is_expired(now));
    }
}
