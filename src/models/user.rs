use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account as stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// bcrypt digest of the password. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}
