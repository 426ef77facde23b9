//! Credential comparison.
//!
//! Secrets are compared through fixed-length SHA-256 digests with
//! [`subtle::ConstantTimeEq`], so the work done does not depend on where a
//! candidate first differs from the expected value or on its length.

use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};

/// Hash a secret to a fixed-length digest.
fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// Compare two strings without data-dependent early exit.
fn secret_eq(candidate: &str, expected: &str) -> Choice {
    #[cfg(test)]
    tests::COMPARISONS.with(|n| n.set(n.get() + 1));

    digest(candidate)[..].ct_eq(&digest(expected)[..])
}

/// Check a submitted PIN against the configured one.
pub fn verify_pin(candidate: &str, expected: &str) -> bool {
    secret_eq(candidate, expected).into()
}

/// Check submitted admin credentials.
///
/// Both the username and the password are always compared; the results are
/// combined without short-circuiting.
pub fn verify_admin(
    username: &str,
    password: &str,
    expected_username: &str,
    expected_password: &str,
) -> bool {
    let user_ok = secret_eq(username, expected_username);
    let pass_ok = secret_eq(password, expected_password);
    (user_ok & pass_ok).into()
}
