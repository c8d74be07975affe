use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

lazy_static! {
    /// Hash checked when the username is unknown, so both login failures cost one Argon2 run.
    static ref DECOY_HASH: Option<String> = hash_password("decoy-password-for-unknown-users").ok();
}

fn hashing_failed(op: &'static str, e: password_hash::Error) -> anyhow::Error {
    error!(error = %e, op, "argon2 failure");
    anyhow::Error::msg(format!("{op}: {e}"))
}

/// Argon2id PHC string for `plain` under a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| hashing_failed("hash password", e))
}

/// Constant-time comparison of `plain` against a stored PHC string.
/// A mismatch is `Ok(false)`; a malformed hash is an error.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| hashing_failed("parse stored hash", e))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(hashing_failed("verify password", e)),
    }
}

/// Burns the same Argon2 work as a real check; always a mismatch.
pub fn verify_decoy(plain: &str) {
    if let Some(decoy) = DECOY_HASH.as_deref() {
        let _ = verify_password(plain, decoy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_password_verifies() {
        let stored = hash_password("pw1").unwrap();
        assert!(verify_password("pw1", &stored).unwrap());
        assert!(!verify_password("pw2", &stored).unwrap());
    }

    #[test]
    fn stored_form_hides_plaintext_behind_salt() {
        let first = hash_password("pw1").unwrap();
        let second = hash_password("pw1").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("pw1"));
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_in_the_password_column_is_an_error() {
        assert!(verify_password("pw1", "plaintext-pw1").is_err());
    }

    #[test]
    fn decoy_hash_is_usable_and_never_matches_user_input() {
        let decoy = DECOY_HASH.as_deref().expect("decoy hash built");
        assert!(!verify_password("pw1", decoy).unwrap());
        verify_decoy("pw1");
    }
}
