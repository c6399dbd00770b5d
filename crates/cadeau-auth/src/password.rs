//! Credential hashing.
//!
//! The web storefront digested passwords with a single unsalted SHA-256
//! pass.  Only its contract, verifying a credential without storing it
//! recoverably, is kept: hashing is Argon2id with a random salt, and stored
//! values are PHC-format strings, so parameters travel with the hash.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash credential: {0}")]
    Hash(String),
    #[error("stored credential hash is malformed: {0}")]
    Malformed(String),
}

/// Hash a plaintext credential into a PHC-format string.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a plaintext credential against a stored PHC string.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|e| PasswordError::Malformed(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_its_own_input() {
        let hash = hash_password("Secret123").unwrap();
        assert!(verify_password("Secret123", &hash).unwrap());
        assert!(!verify_password("secret123", &hash).unwrap());
    }

    #[test]
    fn salts_make_equal_passwords_distinct() {
        let a = hash_password("Secret123").unwrap();
        let b = hash_password("Secret123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("Secret123", &b).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_match() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
