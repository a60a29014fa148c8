//! Argon2id password hashing and verification.
//!
//! Hashes use a random per-password salt and are stored in PHC string
//! format, so algorithm parameters travel with the hash itself. Plaintext
//! passwords never reach the database.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::AtelierError;

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AtelierError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AtelierError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// `Ok(false)` means the password simply did not match; `Err` means the
/// stored hash could not be parsed or verification itself failed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AtelierError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AtelierError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AtelierError::PasswordHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");

        let verified = verify_password("correct-horse-battery-staple", &hash).expect("verify should succeed");
        assert!(verified);
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified);
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
