//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// One variant per business failure the system can surface to a caller.
/// Infrastructure concerns (connection loss, serialization) belong elsewhere;
/// everything here is deterministic and recoverable at the request boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. missing/malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Login rejected: unknown identifier or wrong password.
    ///
    /// Deliberately does not distinguish the two cases for the caller; the
    /// login-attempt audit trail records the real reason.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but is deactivated.
    #[error("account disabled")]
    AccountDisabled,

    /// No authenticated identity was presented.
    #[error("authentication required")]
    Unauthenticated,

    /// The bearer token's signature or structure is invalid.
    #[error("invalid token")]
    InvalidToken,

    /// The bearer token's own expiry claim has passed.
    #[error("token expired")]
    TokenExpired,

    /// The server-side session backing the token is missing or inactive.
    #[error("session revoked")]
    SessionRevoked,

    /// The server-side session's stored expiration has passed.
    #[error("session expired")]
    SessionExpired,

    /// The identity is authenticated but lacks the required role/permission.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A stock mutation would drive the article's quantity below zero.
    #[error("insufficient stock for {article}: available {available}, requested {requested}")]
    InsufficientStock {
        article: String,
        available: f64,
        requested: f64,
    },

    /// The product has no recipe (bill of materials).
    #[error("no recipe defined for this product")]
    NoRecipe,

    /// A recipe line is malformed (missing or non-positive quantity).
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),

    /// The referenced product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// A requested resource was not found.
    #[error("not found")]
    NotFound,

    /// A status value outside the fixed enum was supplied.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// The requested status transition is not in the fixed adjacency table.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// A uniqueness or state conflict (e.g. duplicate username/email).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invalid_recipe(msg: impl Into<String>) -> Self {
        Self::InvalidRecipe(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_stock(
        article: impl Into<String>,
        available: f64,
        requested: f64,
    ) -> Self {
        Self::InsufficientStock {
            article: article.into(),
            available,
            requested,
        }
    }
}
