//! Password hashes for the accounts in `USERS_FILE`.
//!
//! Stored hashes are Argon2id PHC strings (`$argon2id$v=19$m=...`), so the
//! parameters and salt travel with each entry and older hashes keep
//! verifying if the defaults change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Produce a PHC string for `password` under a fresh random salt.
///
/// Used by the `westeros-hash-password` tool when writing account entries.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// A mismatch is `Ok(false)`. An entry that is not a valid PHC string is an
/// error, since it points at a broken users file rather than a bad login.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
