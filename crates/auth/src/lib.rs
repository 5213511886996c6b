//! `atelier-auth` — pure authentication/authorization domain.
//!
//! This crate is intentionally decoupled from HTTP and storage: it owns
//! roles, the closed permission set, token claims and their sign/verify
//! primitives, password hashing, and the pure policy checks. Session
//! persistence and the login orchestration live in `atelier-infra`.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod token;

pub use authorize::{require_permission, require_role};
pub use claims::AuthClaims;
pub use password::{hash_password, verify_password, MIN_PASSWORD_LEN};
pub use permissions::{Permission, PermissionSet};
pub use roles::Role;
pub use token::{parse_expiry, TokenError, TokenSigner, DEFAULT_EXPIRY_HOURS};
