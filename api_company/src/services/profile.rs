use chrono::NaiveDate;
use common::error::{AppError, Res};
use common::jwt::JwtClaims;
use common::sanitize::sanitize;
use db::dtos::company::{ColumnValue, CompanyCreateRequest, CompanyUpdateSet};
use db::models::company::CompanyProfile;
use sqlx::PgPool;

use crate::dtos::company::{RegisterCompanyRequest, UpdateCompanyRequest};
use crate::services::assets::{ImageHost, UploadSource};

const PROFILE_NOT_FOUND: &str = "Company profile not found. Please create a profile first.";

#[derive(Debug, Clone, Copy)]
pub enum AssetKind {
    Logo,
    Banner,
}

impl AssetKind {
    pub fn folder(&self) -> &'static str {
        match self {
            AssetKind::Logo => "company-module/logos",
            AssetKind::Banner => "company-module/banners",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            AssetKind::Logo => "logo_url",
            AssetKind::Banner => "banner_url",
        }
    }
}

/// Creates the single profile for the authenticated owner.
///
/// # Arguments
///
/// * `pool` - A reference to the database connection pool.
/// * `claims` - The JWT claims of the authenticated user.
/// * `req` - The validated creation payload.
///
/// # Returns
///
/// A `Result` containing the persisted `CompanyProfile` or an `AppError`.
/// A second create for the same owner fails with `Conflict`, either from
/// the pre-read here or from the store's unique constraint when two
/// creates race.
pub async fn register_company(
    pool: &PgPool,
    claims: &JwtClaims,
    req: RegisterCompanyRequest,
) -> Res<CompanyProfile> {
    if db::company::get_company_by_owner(pool, claims.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Company already exists for this user".to_string(),
        ));
    }

    let data = sanitize_create(req, &claims.email)?;
    db::company::insert_company(pool, claims.id, data).await
}

/// Fetches the owner's profile, or `None` when it does not exist (not an
/// error). A blank stored email is replaced by the caller's email in the
/// returned value only; this read never writes.
pub async fn get_profile(pool: &PgPool, claims: &JwtClaims) -> Res<Option<CompanyProfile>> {
    let mut profile = db::company::get_company_by_owner(pool, claims.id).await?;

    if let Some(profile) = profile.as_mut() {
        if profile
            .email
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .is_empty()
        {
            profile.email = Some(claims.email.clone());
        }
    }

    Ok(profile)
}

/// Applies a partial update. Fails with `NotFound` when no profile exists
/// yet; an update set that ends up empty degenerates to a read.
pub async fn update_profile(
    pool: &PgPool,
    claims: &JwtClaims,
    req: UpdateCompanyRequest,
) -> Res<CompanyProfile> {
    let existing = db::company::get_company_by_owner(pool, claims.id)
        .await?
        .ok_or_else(|| AppError::NotFound(PROFILE_NOT_FOUND.to_string()))?;

    let updates = build_update_set(&req, existing.social_links.as_ref())?;
    db::company::update_company_by_owner(pool, claims.id, updates).await
}

/// Uploads an asset to the image host and attaches its hosted URL to the
/// profile. On the upload path (`auto_create`) a missing profile is created
/// with sentinel values first; on the edit path it is `NotFound`, checked
/// before paying for an upload.
pub async fn attach_asset(
    pool: &PgPool,
    claims: &JwtClaims,
    host: &dyn ImageHost,
    kind: AssetKind,
    source: UploadSource,
    auto_create: bool,
) -> Res<(String, CompanyProfile)> {
    if !auto_create
        && db::company::get_company_by_owner(pool, claims.id)
            .await?
            .is_none()
    {
        return Err(AppError::NotFound(PROFILE_NOT_FOUND.to_string()));
    }

    let uploaded = match source {
        UploadSource::Buffer { data, mime } => {
            host.upload_buffer(data, &mime, kind.folder()).await?
        }
        UploadSource::Remote(path) => host.upload_url(&path, kind.folder()).await?,
    };

    if auto_create
        && db::company::get_company_by_owner(pool, claims.id)
            .await?
            .is_none()
    {
        db::company::insert_company(pool, claims.id, placeholder_profile(&claims.email)).await?;
    }

    let mut updates = CompanyUpdateSet::default();
    updates.push(kind.column(), ColumnValue::Text(uploaded.url.clone()));
    let profile = db::company::update_company_by_owner(pool, claims.id, updates).await?;

    Ok((uploaded.url, profile))
}

/// Sentinel-valued profile used when an asset arrives before any real
/// profile data, so the URL has something to attach to.
pub fn placeholder_profile(caller_email: &str) -> CompanyCreateRequest {
    CompanyCreateRequest {
        company_name: "My Company".to_string(),
        address: "TBD".to_string(),
        city: "TBD".to_string(),
        state: "TBD".to_string(),
        country: "TBD".to_string(),
        postal_code: "00000".to_string(),
        industry: "Technology".to_string(),
        website: None,
        logo_url: None,
        banner_url: None,
        founded_date: None,
        description: None,
        social_links: None,
        company_size: None,
        email: Some(caller_email.to_string()),
        phone: None,
        mission: None,
        vision: None,
        founding_story: None,
    }
}

/// Sanitizes a creation payload and fills the owner's email in when the
/// payload left it blank.
pub fn sanitize_create(
    req: RegisterCompanyRequest,
    caller_email: &str,
) -> Res<CompanyCreateRequest> {
    let email = match req.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => Some(sanitize(email)),
        _ => Some(caller_email.to_string()),
    };

    Ok(CompanyCreateRequest {
        company_name: sanitize(&req.company_name),
        address: sanitize(&req.address),
        city: sanitize(&req.city),
        state: sanitize(&req.state),
        country: sanitize(&req.country),
        postal_code: sanitize(&req.postal_code),
        industry: sanitize(&req.industry),
        website: req.website.as_deref().map(sanitize),
        logo_url: req.logo_url.as_deref().map(sanitize),
        banner_url: req.banner_url.as_deref().map(sanitize),
        founded_date: parse_founded_date(req.founded_date.as_deref())?,
        description: req.description.as_deref().map(sanitize),
        social_links: req
            .social_links
            .as_ref()
            .map(|links| merge_social_links(None, links)),
        company_size: req.company_size.as_deref().map(sanitize),
        email,
        phone: req.phone.as_deref().map(sanitize),
        mission: req.mission.as_deref().map(sanitize),
        vision: req.vision.as_deref().map(sanitize),
        founding_story: req.founding_story.as_deref().map(sanitize),
    })
}

fn parse_founded_date(raw: Option<&str>) -> Res<Option<NaiveDate>> {
    match raw.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest("Founded date must be a valid date".to_string())),
        _ => Ok(None),
    }
}

/// Builds the column assignments for a partial update.
///
/// Provided strings are trimmed and sanitized; values that end up empty are
/// dropped from the set, except inside `social_links`, where an empty
/// string means "clear this one link". The incoming social map is merged
/// key-by-key over the stored one, so platforms omitted from the request
/// are preserved, and the merged map is written as one column value.
pub fn build_update_set(
    req: &UpdateCompanyRequest,
    existing_social: Option<&serde_json::Value>,
) -> Res<CompanyUpdateSet> {
    let mut set = CompanyUpdateSet::default();

    push_text(&mut set, "company_name", req.company_name.as_deref());
    push_text(&mut set, "address", req.address.as_deref());
    push_text(&mut set, "city", req.city.as_deref());
    push_text(&mut set, "state", req.state.as_deref());
    push_text(&mut set, "country", req.country.as_deref());
    push_text(&mut set, "postal_code", req.postal_code.as_deref());
    push_text(&mut set, "website", req.website.as_deref());
    push_text(&mut set, "industry", req.industry.as_deref());
    push_text(&mut set, "description", req.description.as_deref());
    push_text(&mut set, "company_size", req.company_size.as_deref());
    push_text(&mut set, "email", req.email.as_deref());
    push_text(&mut set, "phone", req.phone.as_deref());
    push_text(&mut set, "mission", req.mission.as_deref());
    push_text(&mut set, "vision", req.vision.as_deref());
    push_text(&mut set, "founding_story", req.founding_story.as_deref());

    if let Some(date) = parse_founded_date(req.founded_date.as_deref())? {
        set.push("founded_date", ColumnValue::Date(date));
    }

    if let Some(links) = &req.social_links {
        set.push(
            "social_links",
            ColumnValue::Json(merge_social_links(existing_social, links)),
        );
    }

    Ok(set)
}

fn push_text(set: &mut CompanyUpdateSet, column: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            set.push(column, ColumnValue::Text(sanitize(trimmed)));
        }
    }
}

fn merge_social_links(
    existing: Option<&serde_json::Value>,
    incoming: &std::collections::BTreeMap<String, String>,
) -> serde_json::Value {
    let mut merged = existing
        .and_then(|value| value.as_object().cloned())
        .unwrap_or_default();

    for (platform, link) in incoming {
        let trimmed = link.trim();
        let cleaned = if trimmed.is_empty() {
            String::new()
        } else {
            sanitize(trimmed)
        };
        merged.insert(platform.clone(), serde_json::Value::String(cleaned));
    }

    serde_json::Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_not_in_the_update_set() {
        let req = UpdateCompanyRequest {
            city: Some("Lyon".to_string()),
            ..Default::default()
        };

        let set = build_update_set(&req, None).unwrap();
        assert_eq!(set.fields.len(), 1);
        assert_eq!(set.get("city"), Some(&ColumnValue::Text("Lyon".to_string())));
        assert!(set.get("company_name").is_none());
    }

    #[test]
    fn strings_are_trimmed_and_sanitized() {
        let req = UpdateCompanyRequest {
            company_name: Some("  <b>Acme</b> Industries  ".to_string()),
            ..Default::default()
        };

        let set = build_update_set(&req, None).unwrap();
        assert_eq!(
            set.get("company_name"),
            Some(&ColumnValue::Text("Acme Industries".to_string()))
        );
    }

    #[test]
    fn empty_strings_are_dropped_outside_social_links() {
        let req = UpdateCompanyRequest {
            description: Some("   ".to_string()),
            phone: Some(String::new()),
            ..Default::default()
        };

        let set = build_update_set(&req, None).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn clearing_one_social_link_preserves_the_others() {
        let existing = json!({ "linkedin": "https://linkedin.com/company/acme" });
        let incoming = std::collections::BTreeMap::from([("twitter".to_string(), String::new())]);
        let req = UpdateCompanyRequest {
            social_links: Some(incoming),
            ..Default::default()
        };

        let set = build_update_set(&req, Some(&existing)).unwrap();
        let Some(ColumnValue::Json(merged)) = set.get("social_links") else {
            panic!("social_links missing from update set");
        };

        assert_eq!(merged["linkedin"], "https://linkedin.com/company/acme");
        assert_eq!(merged["twitter"], "");
    }

    #[test]
    fn social_link_values_are_sanitized() {
        let incoming = std::collections::BTreeMap::from([(
            "facebook".to_string(),
            " <i>https://facebook.com/acme</i> ".to_string(),
        )]);
        let req = UpdateCompanyRequest {
            social_links: Some(incoming),
            ..Default::default()
        };

        let set = build_update_set(&req, None).unwrap();
        let Some(ColumnValue::Json(merged)) = set.get("social_links") else {
            panic!("social_links missing from update set");
        };
        assert_eq!(merged["facebook"], "https://facebook.com/acme");
    }

    #[test]
    fn founded_date_parses_into_a_date_column() {
        let req = UpdateCompanyRequest {
            founded_date: Some("2019-01-01".to_string()),
            ..Default::default()
        };

        let set = build_update_set(&req, None).unwrap();
        assert_eq!(
            set.get("founded_date"),
            Some(&ColumnValue::Date(
                NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()
            ))
        );
    }

    #[test]
    fn unparseable_founded_date_is_rejected() {
        let req = UpdateCompanyRequest {
            founded_date: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_update_set(&req, None),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn same_payload_builds_the_same_update_set() {
        let req = UpdateCompanyRequest {
            city: Some("Lyon".to_string()),
            description: Some("Widgets".to_string()),
            ..Default::default()
        };

        let first = build_update_set(&req, None).unwrap();
        let second = build_update_set(&req, None).unwrap();
        assert_eq!(first.fields, second.fields);
    }

    #[test]
    fn placeholder_profile_carries_sentinels_and_caller_email() {
        let placeholder = placeholder_profile("a@x.com");
        assert_eq!(placeholder.company_name, "My Company");
        assert_eq!(placeholder.address, "TBD");
        assert_eq!(placeholder.city, "TBD");
        assert_eq!(placeholder.state, "TBD");
        assert_eq!(placeholder.country, "TBD");
        assert_eq!(placeholder.postal_code, "00000");
        assert_eq!(placeholder.industry, "Technology");
        assert_eq!(placeholder.email.as_deref(), Some("a@x.com"));
        assert!(placeholder.logo_url.is_none());
    }

    #[test]
    fn create_payload_is_sanitized_and_email_backfilled() {
        let req = RegisterCompanyRequest {
            company_name: " <b>Acme</b> ".to_string(),
            address: "1 Rd".to_string(),
            city: "X1".to_string(),
            state: "Y1".to_string(),
            country: "Z1".to_string(),
            postal_code: "00001".to_string(),
            industry: "Tech".to_string(),
            website: None,
            logo_url: None,
            banner_url: None,
            founded_date: Some("".to_string()),
            description: None,
            social_links: None,
            company_size: None,
            email: Some("  ".to_string()),
            phone: None,
            mission: None,
            vision: None,
            founding_story: None,
        };

        let data = sanitize_create(req, "owner@x.com").unwrap();
        assert_eq!(data.company_name, "Acme");
        assert_eq!(data.email.as_deref(), Some("owner@x.com"));
        assert!(data.founded_date.is_none());
    }
}
