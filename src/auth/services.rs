use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};
use crate::flash::Notice;
use crate::i18n::{Language, DEFAULT_REGION};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Argon2 PHC string with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))
}

/// `Ok(false)` on a wrong password. Errors only when the stored hash
/// cannot be read.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("stored hash unreadable: {e}"))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {e}")),
    }
}

/// Blank form fields count as absent.
pub(crate) fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

/// Creates an account. Username is checked before email.
pub async fn register(
    db: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
    region: Option<&str>,
) -> AppResult<User> {
    let username = username.trim();
    let email = email.trim().to_lowercase();

    if username.is_empty() || password.is_empty() || !is_valid_email(&email) {
        warn!(%username, %email, "registration form incomplete");
        return Err(AppError::invalid(Notice::InvalidInput, "/register"));
    }

    if User::find_by_username(db, username).await?.is_some() {
        warn!(%username, "username already taken");
        return Err(AppError::DuplicateUsername);
    }
    if User::find_by_email(db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let hash = hash_password(password)?;
    let region = non_blank(region).unwrap_or(DEFAULT_REGION);

    let user = User::create(db, username, &email, &hash, Some(region))
        .await
        .map_err(duplicate_from_constraint)?;

    info!(user_id = %user.id, %username, %email, "user registered");
    Ok(user)
}

/// A racing insert can still trip the unique indexes.
fn duplicate_from_constraint(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let msg = db_err.message();
            if msg.contains("users.username") {
                return AppError::DuplicateUsername;
            }
            if msg.contains("users.email") {
                return AppError::DuplicateEmail;
            }
        }
    }
    AppError::Database(e)
}

/// Checks credentials; both failure causes look the same to the caller.
pub async fn authenticate(db: &SqlitePool, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim().to_lowercase();

    let Some(user) = User::find_by_email(db, &email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, %email, "user logged in");
    Ok(user)
}

pub async fn update_profile(
    db: &SqlitePool,
    user_id: Uuid,
    region: Option<&str>,
    language: Option<&str>,
) -> AppResult<User> {
    let region = non_blank(region);
    let language = match non_blank(language) {
        Some(code) => Some(
            Language::from_code(code)
                .ok_or(AppError::invalid(Notice::UnsupportedLanguage, "/settings"))?
                .code(),
        ),
        None => None,
    };

    let user = User::update_profile(db, user_id, region, language)
        .await?
        .ok_or(AppError::Unauthenticated)?;
    info!(%user_id, region = ?user.region, language = ?user.language, "profile updated");
    Ok(user)
}

#[cfg(test)]
mod credential_tests {
    use super::*;
    use crate::db;

    #[test]
    fn email_shape_is_checked() {
        assert!(is_valid_email("ali@x.com"));
        assert!(!is_valid_email("ali"));
        assert!(!is_valid_email("ali@x"));
    }

    #[tokio::test]
    async fn same_password_is_stored_with_different_salts() {
        let pool = db::connect_in_memory().await.unwrap();
        let a = register(&pool, "ali", "ali@x.com", "namoz123", None).await.unwrap();
        let b = register(&pool, "vali", "vali@x.com", "namoz123", None).await.unwrap();

        assert!(a.password_hash.starts_with("$argon2"));
        assert_ne!(a.password_hash, b.password_hash);
        assert!(verify_password("namoz123", &b.password_hash).unwrap());
    }

    #[tokio::test]
    async fn password_is_not_trimmed() {
        let pool = db::connect_in_memory().await.unwrap();
        register(&pool, "ali", "ali@x.com", " so‘z ", None).await.unwrap();

        assert!(authenticate(&pool, "ali@x.com", " so‘z ").await.is_ok());
        let err = authenticate(&pool, "ali@x.com", "so‘z").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unreadable_stored_hash_is_a_server_error() {
        let pool = db::connect_in_memory().await.unwrap();
        User::create(&pool, "ali", "ali@x.com", "plain-text", None).await.unwrap();

        let err = authenticate(&pool, "ali@x.com", "plain-text").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.redirect().is_none());
    }
}
