//! Password hashing
//!
//! Thin wrapper over bcrypt with a fixed work factor. Verification goes
//! through bcrypt's own constant-time comparison.

use crate::error::Result;
use std::sync::OnceLock;

/// Fixed bcrypt work factor for all stored credentials
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with the fixed work factor
pub fn hash_password(plaintext: &str) -> Result<String> {
    Ok(bcrypt::hash(plaintext, BCRYPT_COST)?)
}

/// Verify a plaintext password against a stored hash
///
/// Returns `Ok(false)` on mismatch; an `Err` means the stored hash itself
/// could not be parsed.
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(plaintext, hash)?)
}

/// A hash to verify against when no account matches the supplied email,
/// so the unknown-email path costs one bcrypt comparison like every other
/// login attempt.
pub fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        bcrypt::hash("registre-dummy-password", BCRYPT_COST)
            .expect("bcrypt hashing of the dummy password cannot fail")
    })
}
