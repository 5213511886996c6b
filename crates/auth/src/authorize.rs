//! Pure policy checks against an authenticated identity.
//!
//! - No IO
//! - No panics
//! - No business logic
//!
//! The API layer calls these after the session gate has attached verified
//! claims to the request.

use atelier_core::DomainError;

use crate::{AuthClaims, Permission};

/// Pass only if the decoded role is one of `allowed`.
pub fn require_role(claims: &AuthClaims, allowed: &[&str]) -> Result<(), DomainError> {
    if allowed.iter().any(|r| claims.role.as_str() == *r) {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "role '{}' is not one of {allowed:?}",
            claims.role
        )))
    }
}

/// Pass if the role is admin, or the permission is in the login snapshot.
pub fn require_permission(claims: &AuthClaims, permission: Permission) -> Result<(), DomainError> {
    if claims.role.is_admin() || claims.permissions.contains(permission) {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "missing permission '{permission}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PermissionSet, Role};
    use atelier_core::UserId;

    fn claims(role: &'static str, perms: PermissionSet) -> AuthClaims {
        AuthClaims {
            sub: UserId::new(3),
            username: "sami".into(),
            email: "sami@example.com".into(),
            role: Role::new(role),
            permissions: perms,
            iat: 0,
            exp: i64::MAX,
        }
    }

    #[test]
    fn admin_passes_every_permission_check() {
        let c = claims("admin", PermissionSet::new());
        for p in Permission::ALL {
            assert!(require_permission(&c, p).is_ok());
        }
    }

    #[test]
    fn snapshot_permission_passes_and_missing_is_forbidden() {
        let c = claims("operator", [Permission::ProductionRun].into_iter().collect());
        assert!(require_permission(&c, Permission::ProductionRun).is_ok());
        assert!(matches!(
            require_permission(&c, Permission::UsersManage),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn role_check_matches_exactly() {
        let c = claims("manager", PermissionSet::new());
        assert!(require_role(&c, &["admin", "manager"]).is_ok());
        assert!(matches!(
            require_role(&c, &["admin"]),
            Err(DomainError::Forbidden(_))
        ));
    }
}
