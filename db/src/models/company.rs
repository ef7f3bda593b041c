use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One row per owning user; `owner_id` is UNIQUE at the store level.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub id: i32,
    pub owner_id: i32,
    pub company_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub industry: String,
    pub founded_date: Option<NaiveDate>,
    pub description: Option<String>,
    /// Platform name → URL, keys among linkedin/twitter/facebook/instagram.
    /// An empty string is a deliberately cleared link.
    pub social_links: Option<serde_json::Value>,
    pub company_size: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub founding_story: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
