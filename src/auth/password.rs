//! Argon2id password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::error;

use crate::error::{LedgerError, LedgerResult};

/// Hash a password into a PHC string with a fresh random salt
pub fn hash_password(plain: &str) -> LedgerResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            LedgerError::Validation(format!("Failed to hash password: {}", e))
        })?
        .to_string();
    Ok(hash)
}

/// Check a password against a stored PHC string
///
/// A hash that cannot be parsed means the users table is damaged, which is
/// reported as a storage failure rather than a wrong password.
pub fn verify_password(plain: &str, hash: &str) -> LedgerResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        LedgerError::StorageUnavailable(format!("Stored password hash is malformed: {}", e))
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
