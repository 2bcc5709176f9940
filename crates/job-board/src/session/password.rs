use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::BoardError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a plaintext password into an argon2id PHC string.
pub fn hash_password(plain: &str) -> Result<String, BoardError> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        return Err(BoardError::validation(format!(
            "Password must contain at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| BoardError::Upstream(format!("password hashing failed: {err}")))
}

/// Verify a login attempt against a stored hash. Malformed hashes never match.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
