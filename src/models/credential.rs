use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Credential row checked at sign-in. Email is unique; the digest is a salted
/// SHA-256 of the password (see `auth::password`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Credential {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}
