//! Password hashing (bcrypt: slow, salted, one-way).

use thiserror::Error;

/// Minimum accepted password length on change/create.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// Hash a plaintext password for storage.
pub fn hash_password(plain: &str) -> Result<String, HashError> {
    Ok(bcrypt::hash(plain, bcrypt::DEFAULT_COST)?)
}

/// Verify a plaintext password against a stored hash.
///
/// Comparison happens over the hash output (constant-time inside bcrypt);
/// malformed stored hashes count as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the tests fast; production uses DEFAULT_COST.
    fn test_hash(plain: &str) -> String {
        bcrypt::hash(plain, 4).unwrap()
    }

    #[test]
    fn verify_accepts_the_right_password() {
        let hash = test_hash("correct horse");
        assert!(verify_password("correct horse", &hash));
    }

    #[test]
    fn verify_rejects_the_wrong_password() {
        let hash = test_hash("correct horse");
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn malformed_hash_counts_as_mismatch() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
