use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_password, verify_decoy, verify_password},
        repo::CredentialStore,
        repo_types::User,
    },
    error::AppError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Lowercased, trimmed form used as the stored username.
pub(crate) fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Hash `password` and store a new user.
pub async fn register(
    users: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let hash = hash_password(password)?;
    let user = users.create(username, &hash).await?;
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// True when `username` exists and `password` matches its stored hash.
pub async fn verify(
    users: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<bool, AppError> {
    let Some(user) = users.find_by_username(username).await? else {
        warn!(username = %username, "login unknown username");
        verify_decoy(password);
        return Ok(false);
    };
    let ok = verify_password(password, &user.password_hash)?;
    if !ok {
        warn!(username = %username, user_id = user.id, "login invalid password");
    }
    Ok(ok)
}

/// Like [`verify`], but a mismatch becomes `InvalidCredentials`.
pub async fn authenticate(
    users: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<(), AppError> {
    if verify(users, username, password).await? {
        Ok(())
    } else {
        Err(AppError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryCredentialStore;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn usernames_are_trimmed_and_lowercased() {
        assert_eq!(normalize_username("  A@X.com "), "a@x.com");
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_first_hash() {
        let store = MemoryCredentialStore::default();
        register(&store, "a@x.com", "pw1").await.expect("first register");
        let before = store.find_by_username("a@x.com").await.unwrap().unwrap();

        let err = register(&store, "a@x.com", "pw2").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));

        let after = store.find_by_username("a@x.com").await.unwrap().unwrap();
        assert_eq!(before.password_hash, after.password_hash);
        assert_eq!(before.id, after.id);
    }

    #[tokio::test]
    async fn verify_matches_only_the_registered_password() {
        let store = MemoryCredentialStore::default();
        register(&store, "a@x.com", "pw1").await.unwrap();
        assert!(matches!(
            register(&store, "a@x.com", "pw2").await,
            Err(AppError::DuplicateUsername)
        ));

        assert!(verify(&store, "a@x.com", "pw1").await.unwrap());
        assert!(!verify(&store, "a@x.com", "pw2").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_user_looks_like_wrong_password() {
        let store = MemoryCredentialStore::default();
        register(&store, "a@x.com", "pw1").await.unwrap();

        assert!(!verify(&store, "nobody@x.com", "pw1").await.unwrap());
        let unknown = authenticate(&store, "nobody@x.com", "pw1").await.unwrap_err();
        let wrong = authenticate(&store, "a@x.com", "nope").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(authenticate(&store, "a@x.com", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn stored_hash_is_not_plaintext() {
        let store = MemoryCredentialStore::default();
        let user = register(&store, "a@x.com", "pw1").await.unwrap();
        assert_ne!(user.password_hash, "pw1");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }
}
