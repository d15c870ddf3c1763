//! Password hashing for the auth gateway.
//!
//! Argon2id with a per-password random salt. Only the PHC-format hash ever
//! leaves this module; the gateway stores and compares nothing else.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Hashes a password under a freshly generated salt and returns the PHC
/// string to store.
///
/// ## Errors
/// Returns `InvalidConfiguration` if the hasher rejects its parameters.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InvalidConfiguration(format!("password hashing failed: {e}")))
}

/// ## Summary
/// Checks a candidate password against a stored PHC hash.
///
/// ## Errors
/// Returns `NotAuthenticated` on a mismatch, so the caller cannot tell a
/// wrong password from an unknown account, and `InvalidConfiguration` if the
/// stored hash does not parse as PHC.
pub fn verify_password(password: &str, password_hash: &str) -> ServiceResult<()> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| {
        ServiceError::InvalidConfiguration(format!("stored hash is not valid PHC: {e}"))
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|err| {
            tracing::trace!(%err, "Password mismatch");
            ServiceError::NotAuthenticated
        })
}
