use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Argon2 PHC string. Never serialized out of the API.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub full_name: String,
    pub gender: String,
    pub mobile_no: String,
    pub signup_type: String,
    pub is_email_verified: bool,
    pub is_mobile_verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
