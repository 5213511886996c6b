use thiserror::Error;

use atelier_core::DomainError;

/// Error surfaced by the execution layer.
///
/// `Domain` carries the business taxonomy through unchanged so the API can
/// pattern-match on it; everything else is an infrastructure failure that
/// callers present generically.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Password(#[from] atelier_auth::password::HashError),

    #[error("token signing failed")]
    Token,
}

impl InfraError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            InfraError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Unique-constraint violations surface as domain conflicts (duplicate
/// username/email on user creation).
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_pass_through_transparently() {
        let err: InfraError = DomainError::NoRecipe.into();
        assert_eq!(err.to_string(), DomainError::NoRecipe.to_string());
        assert_eq!(err.as_domain(), Some(&DomainError::NoRecipe));
    }
}
