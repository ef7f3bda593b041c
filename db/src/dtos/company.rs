use chrono::NaiveDate;

/// Column values already sanitized and validated by the service layer.
pub struct CompanyCreateRequest {
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
    pub social_links: Option<serde_json::Value>,
    pub company_size: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub founding_story: Option<String>,
}

/// A single column assignment in a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Date(NaiveDate),
    Json(serde_json::Value),
}

/// Ordered set of column assignments for the dynamic UPDATE. Column names
/// come from a fixed whitelist in the service layer, never from request
/// keys, since they are interpolated into the statement.
#[derive(Debug, Default)]
pub struct CompanyUpdateSet {
    pub fields: Vec<(&'static str, ColumnValue)>,
}

impl CompanyUpdateSet {
    pub fn push(&mut self, column: &'static str, value: ColumnValue) {
        self.fields.push((column, value));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}
