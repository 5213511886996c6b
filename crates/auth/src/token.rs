//! Signed bearer token issue/verify (HS256).
//!
//! The token is one of the two authorities for a request: it must verify
//! *and* the server-side session row it was issued with must still be
//! active. Neither alone is sufficient.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use atelier_core::UserId;

use crate::{AuthClaims, PermissionSet, Role};

/// Fallback when the configured expiry string is unparsable.
pub const DEFAULT_EXPIRY_HOURS: i64 = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature or structure invalid.
    #[error("invalid token")]
    Invalid,

    /// Signature valid but the expiry claim has passed.
    #[error("token expired")]
    Expired,
}

/// Parse an expiry of the form `<integer><unit>` with unit in `s|m|h|d`.
///
/// Unparsable input falls back to the 8-hour default.
pub fn parse_expiry(s: &str) -> Duration {
    let default = Duration::hours(DEFAULT_EXPIRY_HOURS);
    let s = s.trim();
    let Some(unit) = s.chars().last() else {
        return default;
    };
    let Ok(value) = s[..s.len() - unit.len_utf8()].parse::<i64>() else {
        return default;
    };
    if value <= 0 {
        return default;
    }
    match unit {
        's' => Duration::seconds(value),
        'm' => Duration::minutes(value),
        'h' => Duration::hours(value),
        'd' => Duration::days(value),
        _ => default,
    }
}

/// Issues and verifies signed bearer tokens with a fixed secret and expiry.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Sign a token for the given identity snapshot.
    ///
    /// Returns the encoded token and its expiration instant (also persisted
    /// on the session row).
    pub fn sign(
        &self,
        user_id: UserId,
        username: &str,
        email: &str,
        role: Role,
        permissions: PermissionSet,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let expires_at = now + self.expiry;
        let claims = AuthClaims {
            sub: user_id,
            username: username.to_string(),
            email: email.to_string(),
            role,
            permissions,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| TokenError::Invalid)?;
        Ok((token, expires_at))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<AuthClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<AuthClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Permission;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", Duration::hours(8))
    }

    #[test]
    fn sign_verify_round_trip_preserves_claims() {
        let perms: PermissionSet = [Permission::StockAdjust, Permission::InvoicesStatus]
            .into_iter()
            .collect();
        let (token, expires_at) = signer()
            .sign(
                UserId::new(7),
                "nadia",
                "nadia@example.com",
                Role::new("manager"),
                perms.clone(),
                Utc::now(),
            )
            .unwrap();

        let claims = signer().verify(&token).unwrap();
        assert_eq!(claims.sub, UserId::new(7));
        assert_eq!(claims.username, "nadia");
        assert_eq!(claims.role.as_str(), "manager");
        assert_eq!(claims.permissions, perms);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn expired_token_is_distinguished_from_invalid() {
        let past = Utc::now() - Duration::hours(10);
        let (token, _) = signer()
            .sign(
                UserId::new(1),
                "x",
                "x@example.com",
                Role::new("operator"),
                PermissionSet::new(),
                past,
            )
            .unwrap();
        assert_eq!(signer().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let (token, _) = signer()
            .sign(
                UserId::new(1),
                "x",
                "x@example.com",
                Role::new("operator"),
                PermissionSet::new(),
                Utc::now(),
            )
            .unwrap();
        let other = TokenSigner::new("other-secret", Duration::hours(8));
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert_eq!(signer().verify("not.a.token"), Err(TokenError::Invalid));
    }

    #[test]
    fn expiry_strings_parse_per_unit() {
        assert_eq!(parse_expiry("30s"), Duration::seconds(30));
        assert_eq!(parse_expiry("15m"), Duration::minutes(15));
        assert_eq!(parse_expiry("8h"), Duration::hours(8));
        assert_eq!(parse_expiry("2d"), Duration::days(2));
    }

    #[test]
    fn unparsable_expiry_defaults_to_eight_hours() {
        for s in ["", "h", "8", "abc", "-5m", "0d", "8 h"] {
            assert_eq!(parse_expiry(s), Duration::hours(8), "input: {s:?}");
        }
    }
}
