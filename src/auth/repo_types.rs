use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                     // unique user ID
    pub username: String,             // unique display name
    pub email: String,                // unique, lowercased
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub region: Option<String>,       // city passed to the timings API
    pub language: Option<String>,     // interface language code
    pub created_at: OffsetDateTime,   // creation timestamp
}
