//! One-way password comparison against stored bcrypt hashes.
//!
//! bcrypt compares the derived digest in constant time. A malformed stored
//! hash is a mismatch, never an error surfaced to the caller.

use once_cell::sync::Lazy;
use tracing::{error, warn};

use crate::errors::{DomainError, InfraErrorKind};

const DUMMY_PASSWORD: &str = "not-a-real-password";

/// Hash compared against when the account does not exist, so the absent-user
/// path costs one bcrypt verification like the wrong-password path does.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    match bcrypt::hash(DUMMY_PASSWORD, bcrypt::DEFAULT_COST) {
        Ok(hash) => Some(hash),
        Err(e) => {
            error!(error = %e, "failed to build dummy password hash");
            None
        }
    }
});

/// Build the dummy hash now instead of on the first absent-user login.
/// Returns `false` when hashing failed (already logged).
pub fn warm_dummy_hash() -> bool {
    DUMMY_HASH.is_some()
}

/// `true` when `supplied` hashes to `stored_hash`.
pub fn passwords_match(stored_hash: &str, supplied: &str) -> bool {
    match bcrypt::verify(supplied, stored_hash) {
        Ok(matched) => matched,
        Err(e) => {
            warn!(error = %e, "stored password hash could not be parsed");
            false
        }
    }
}

/// Runs [`passwords_match`] on the blocking pool.
pub async fn verify_password(stored_hash: &str, supplied: &str) -> bool {
    let stored_hash = stored_hash.to_owned();
    let supplied = supplied.to_owned();

    tokio::task::spawn_blocking(move || passwords_match(&stored_hash, &supplied))
        .await
        .unwrap_or(false)
}

/// Burn one verification's worth of work for a user that was not found.
pub async fn verify_against_dummy(supplied: &str) {
    let supplied = supplied.to_owned();
    let _ = tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = bcrypt::verify(&supplied, hash);
        }
    })
    .await;
}

/// Hash a password for storage. Used by provisioning and tests.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, DomainError> {
    bcrypt::hash(plain, cost).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("password_hash".into()),
            format!("failed to hash password: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the suite fast.
    const COST: u32 = 4;

    #[test]
    fn matching_password_is_accepted() {
        let hash = hash_password("correct horse", COST).unwrap();
        assert!(passwords_match(&hash, "correct horse"));
    }

    #[test]
    fn wrong_password_is_a_plain_false() {
        let hash = hash_password("correct horse", COST).unwrap();
        assert!(!passwords_match(&hash, "battery staple"));
        assert!(!passwords_match(&hash, ""));
        assert!(!passwords_match(&hash, "correct horse "));
    }

    #[test]
    fn malformed_stored_hash_is_a_mismatch() {
        assert!(!passwords_match("plaintext-in-db", "plaintext-in-db"));
        assert!(!passwords_match("", ""));
    }

    #[tokio::test]
    async fn async_verification_agrees_with_sync() {
        let hash = hash_password("s3cret", COST).unwrap();
        assert!(verify_password(&hash, "s3cret").await);
        assert!(!verify_password(&hash, "s3cre").await);
    }

    #[test]
    fn dummy_hash_is_a_real_bcrypt_hash() {
        assert!(warm_dummy_hash());
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(bcrypt::verify(DUMMY_PASSWORD, hash).unwrap());
    }

    #[tokio::test]
    async fn dummy_verification_completes() {
        verify_against_dummy("anything").await;
    }
}
