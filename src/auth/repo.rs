use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;

const COLUMNS: &str = "id, username, email, password_hash, region, language, created_at";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = ?1"))
            .bind(email)
            .fetch_optional(db)
            .await
    }

    /// Find a user by username.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = ?1"))
            .bind(username)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
        region: Option<&str>,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, region, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(region)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Update region and/or language; `None` leaves a column untouched.
    pub async fn update_profile(
        db: &SqlitePool,
        id: Uuid,
        region: Option<&str>,
        language: Option<&str>,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET region = COALESCE(?2, region),
                language = COALESCE(?3, language)
            WHERE id = ?1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(region)
        .bind(language)
        .fetch_optional(db)
        .await
    }
}
