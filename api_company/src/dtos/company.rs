use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use db::models::company::CompanyProfile;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// The platforms a profile may carry links for.
pub const SOCIAL_PLATFORMS: [&str; 4] = ["linkedin", "twitter", "facebook", "instagram"];

static WEBSITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(localhost(:\d+)?|.+\..+)").unwrap());

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCompanyRequest {
    #[validate(length(min = 2, message = "Company name must be at least 2 characters"))]
    pub company_name: String,
    #[validate(length(min = 3, message = "Address must be at least 3 characters"))]
    pub address: String,
    #[validate(length(min = 2, message = "City must be at least 2 characters"))]
    pub city: String,
    #[validate(length(min = 2, message = "State must be at least 2 characters"))]
    pub state: String,
    #[validate(length(min = 2, message = "Country must be at least 2 characters"))]
    pub country: String,
    #[validate(length(min = 3, message = "Postal code must be at least 3 characters"))]
    pub postal_code: String,
    #[validate(length(min = 2, message = "Industry must be at least 2 characters"))]
    pub industry: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub founded_date: Option<String>,
    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
    pub company_size: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 1000, message = "Mission must be less than 1000 characters"))]
    pub mission: Option<String>,
    #[validate(length(max = 1000, message = "Vision must be less than 1000 characters"))]
    pub vision: Option<String>,
    #[validate(length(max = 2000, message = "Founding story must be less than 2000 characters"))]
    pub founding_story: Option<String>,
}

impl RegisterCompanyRequest {
    pub fn validate_extra(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_website(&mut errors, self.website.as_deref());
        check_founded_date(&mut errors, self.founded_date.as_deref());
        check_social_keys(&mut errors, self.social_links.as_ref());
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Partial update: only provided keys are touched. Per-field rules apply to
/// provided values only.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 2, message = "Company name must be at least 2 characters"))]
    pub company_name: Option<String>,
    #[validate(length(min = 3, message = "Address must be at least 3 characters"))]
    pub address: Option<String>,
    #[validate(length(min = 2, message = "City must be at least 2 characters"))]
    pub city: Option<String>,
    #[validate(length(min = 2, message = "State must be at least 2 characters"))]
    pub state: Option<String>,
    #[validate(length(min = 2, message = "Country must be at least 2 characters"))]
    pub country: Option<String>,
    #[validate(length(min = 3, message = "Postal code must be at least 3 characters"))]
    pub postal_code: Option<String>,
    #[validate(length(min = 2, message = "Industry must be at least 2 characters"))]
    pub industry: Option<String>,
    pub website: Option<String>,
    pub founded_date: Option<String>,
    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
    pub company_size: Option<String>,
    #[validate(email(message = "Email must be valid"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 1000, message = "Mission must be less than 1000 characters"))]
    pub mission: Option<String>,
    #[validate(length(max = 1000, message = "Vision must be less than 1000 characters"))]
    pub vision: Option<String>,
    #[validate(length(max = 2000, message = "Founding story must be less than 2000 characters"))]
    pub founding_story: Option<String>,
}

impl UpdateCompanyRequest {
    pub fn validate_extra(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_website(&mut errors, self.website.as_deref());
        check_founded_date(&mut errors, self.founded_date.as_deref());
        check_social_keys(&mut errors, self.social_links.as_ref());
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_website(errors: &mut ValidationErrors, website: Option<&str>) {
    if let Some(website) = website {
        let trimmed = website.trim();
        if !trimmed.is_empty() && !WEBSITE_RE.is_match(trimmed) {
            errors.add(
                "website",
                ValidationError::new("url").with_message("Website must be a valid URL".into()),
            );
        }
    }
}

fn check_founded_date(errors: &mut ValidationErrors, founded_date: Option<&str>) {
    if let Some(raw) = founded_date {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() {
            errors.add(
                "founded_date",
                ValidationError::new("date")
                    .with_message("Founded date must be a valid date".into()),
            );
        }
    }
}

fn check_social_keys(errors: &mut ValidationErrors, links: Option<&BTreeMap<String, String>>) {
    if let Some(links) = links {
        for platform in links.keys() {
            if !SOCIAL_PLATFORMS.contains(&platform.as_str()) {
                errors.add(
                    "social_links",
                    ValidationError::new("platform")
                        .with_message("Unknown social platform".into()),
                );
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssetUploadResponse {
    pub url: String,
    pub company: CompanyProfile,
}

/// JSON alternative to a multipart upload: a remote URL or local path the
/// image host can fetch itself.
#[derive(Debug, Deserialize)]
pub struct FilePathRequest {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_accepts_standard_and_localhost_urls() {
        let mut errors = ValidationErrors::new();
        check_website(&mut errors, Some("https://acme.example.com"));
        check_website(&mut errors, Some("http://localhost:5173"));
        check_website(&mut errors, Some(""));
        assert!(errors.is_empty());
    }

    #[test]
    fn website_rejects_bare_words() {
        let mut errors = ValidationErrors::new();
        check_website(&mut errors, Some("not-a-url"));
        assert!(!errors.is_empty());
    }

    #[test]
    fn description_over_2000_chars_fails() {
        let req = UpdateCompanyRequest {
            description: Some("a".repeat(2001)),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateCompanyRequest {
            description: Some("a".repeat(2000)),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn founded_date_must_parse() {
        let mut errors = ValidationErrors::new();
        check_founded_date(&mut errors, Some("2019-01-01"));
        check_founded_date(&mut errors, Some(" "));
        assert!(errors.is_empty());

        check_founded_date(&mut errors, Some("soon"));
        assert!(!errors.is_empty());
    }

    #[test]
    fn unknown_social_platform_fails() {
        let links = BTreeMap::from([("myspace".to_string(), "http://m.example.com".to_string())]);
        let req = UpdateCompanyRequest {
            social_links: Some(links),
            ..Default::default()
        };
        assert!(req.validate_extra().is_err());
    }

    #[test]
    fn known_social_platforms_pass() {
        let links = BTreeMap::from([
            ("linkedin".to_string(), "https://linkedin.com/company/acme".to_string()),
            ("twitter".to_string(), String::new()),
        ]);
        let req = UpdateCompanyRequest {
            social_links: Some(links),
            ..Default::default()
        };
        assert!(req.validate_extra().is_ok());
    }
}
