//! Argon2 password hashing.
//!
//! Stored hashes are PHC strings, so parameters travel with the hash and can
//! be tightened later without rehashing existing rows eagerly.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

/// Failure while producing a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct HashError {
    message: String,
}

impl HashError {
    fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(HashError::new)?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(HashError::new)?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(HashError::new)?
        .to_string();
    Ok(phc)
}

/// Verify a password against a stored PHC string.
///
/// An unparseable hash verifies false; the row is treated as having no
/// usable password rather than erroring the sign-in path.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}
