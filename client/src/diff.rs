use chrono::Datelike;
use db::models::company::CompanyProfile;
use serde_json::{Map, Value};

/// Flat camelCase form state of the profile setup wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub description: String,
    pub website: String,
    pub industry: String,
    pub size: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    /// Year only; normalized to `YYYY-01-01` when compared or submitted.
    pub founded_year: String,
    pub founding_story: String,
    pub mission: String,
    pub vision: String,
    pub email: String,
    pub phone: String,
    pub linkedin_url: String,
    pub twitter_url: String,
    pub facebook_url: String,
    pub instagram_url: String,
}

const SOCIAL_FIELDS: [&str; 4] = ["linkedin", "twitter", "facebook", "instagram"];

impl ProfileForm {
    /// Seeds the wizard from the last known server-side profile.
    pub fn from_profile(profile: &CompanyProfile) -> Self {
        let social = |platform: &str| -> String {
            profile
                .social_links
                .as_ref()
                .and_then(|links| links.get(platform))
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string()
        };

        ProfileForm {
            name: profile.company_name.clone(),
            description: profile.description.clone().unwrap_or_default(),
            website: profile.website.clone().unwrap_or_default(),
            industry: profile.industry.clone(),
            size: profile.company_size.clone().unwrap_or_default(),
            address: profile.address.clone(),
            city: profile.city.clone(),
            state: profile.state.clone(),
            country: profile.country.clone(),
            zip_code: profile.postal_code.clone(),
            founded_year: profile
                .founded_date
                .map(|date| date.year().to_string())
                .unwrap_or_default(),
            founding_story: profile.founding_story.clone().unwrap_or_default(),
            mission: profile.mission.clone().unwrap_or_default(),
            vision: profile.vision.clone().unwrap_or_default(),
            email: profile.email.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
            linkedin_url: social("linkedin"),
            twitter_url: social("twitter"),
            facebook_url: social("facebook"),
            instagram_url: social("instagram"),
        }
    }
}

/// Computes the set of changed fields between the form and the last known
/// server-side profile, keyed by backend field name (`zipCode` →
/// `postal_code`, social URLs nested under `social_links`).
///
/// Both sides are normalized to trimmed strings; a field is changed iff the
/// normalized values differ, so whitespace-only edits are not changes. An
/// empty result means the save can short-circuit without a network call;
/// this is a UX device only, the server never relies on it.
pub fn changed_fields(form: &ProfileForm, current: &CompanyProfile) -> Map<String, Value> {
    let mut changed = Map::new();

    let scalar_fields: [(&str, &str, Option<&str>); 15] = [
        ("company_name", &form.name, Some(current.company_name.as_str())),
        ("description", &form.description, current.description.as_deref()),
        ("website", &form.website, current.website.as_deref()),
        ("industry", &form.industry, Some(current.industry.as_str())),
        ("company_size", &form.size, current.company_size.as_deref()),
        ("address", &form.address, Some(current.address.as_str())),
        ("city", &form.city, Some(current.city.as_str())),
        ("state", &form.state, Some(current.state.as_str())),
        ("country", &form.country, Some(current.country.as_str())),
        ("postal_code", &form.zip_code, Some(current.postal_code.as_str())),
        ("founding_story", &form.founding_story, current.founding_story.as_deref()),
        ("mission", &form.mission, current.mission.as_deref()),
        ("vision", &form.vision, current.vision.as_deref()),
        ("email", &form.email, current.email.as_deref()),
        ("phone", &form.phone, current.phone.as_deref()),
    ];

    for (backend_key, frontend, backend) in scalar_fields {
        if frontend.trim() != backend.unwrap_or_default().trim() {
            changed.insert(
                backend_key.to_string(),
                Value::String(frontend.trim().to_string()),
            );
        }
    }

    // foundedYear carries only a year in the form; the backend stores a date.
    let year = form.founded_year.trim();
    let normalized_year = if year.is_empty() {
        String::new()
    } else {
        format!("{year}-01-01")
    };
    let backend_date = current
        .founded_date
        .map(|date| date.to_string())
        .unwrap_or_default();
    if normalized_year != backend_date {
        let value = if normalized_year.is_empty() {
            Value::Null
        } else {
            Value::String(normalized_year)
        };
        changed.insert("founded_date".to_string(), value);
    }

    let mut social = Map::new();
    for platform in SOCIAL_FIELDS {
        let frontend = match platform {
            "linkedin" => &form.linkedin_url,
            "twitter" => &form.twitter_url,
            "facebook" => &form.facebook_url,
            _ => &form.instagram_url,
        };
        let backend = current
            .social_links
            .as_ref()
            .and_then(|links| links.get(platform))
            .and_then(|value| value.as_str())
            .unwrap_or_default();

        if frontend.trim() != backend.trim() {
            // empty string survives here: it clears a single link
            social.insert(
                platform.to_string(),
                Value::String(frontend.trim().to_string()),
            );
        }
    }
    if !social.is_empty() {
        changed.insert("social_links".to_string(), Value::Object(social));
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn profile() -> CompanyProfile {
        CompanyProfile {
            id: 1,
            owner_id: 1,
            company_name: "Acme".to_string(),
            address: "1 Road".to_string(),
            city: "Lyon".to_string(),
            state: "ARA".to_string(),
            country: "France".to_string(),
            postal_code: "69001".to_string(),
            website: Some("https://acme.example.com".to_string()),
            logo_url: None,
            banner_url: None,
            industry: "Technology".to_string(),
            founded_date: Some(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()),
            description: Some("Widgets".to_string()),
            social_links: Some(serde_json::json!({
                "linkedin": "https://linkedin.com/company/acme",
                "twitter": "https://twitter.com/acme",
            })),
            company_size: Some("11-50".to_string()),
            email: Some("hello@acme.example.com".to_string()),
            phone: Some("+33400000000".to_string()),
            mission: None,
            vision: None,
            founding_story: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn unchanged_form_produces_empty_set() {
        let current = profile();
        let form = ProfileForm::from_profile(&current);
        assert!(changed_fields(&form, &current).is_empty());
    }

    #[test]
    fn whitespace_only_edits_are_not_changes() {
        let current = profile();
        let mut form = ProfileForm::from_profile(&current);
        form.name = format!("  {}  ", current.company_name);
        form.city = format!("{} ", current.city);
        assert!(changed_fields(&form, &current).is_empty());
    }

    #[test]
    fn zip_code_maps_to_postal_code() {
        let current = profile();
        let mut form = ProfileForm::from_profile(&current);
        form.zip_code = "69002".to_string();

        let changed = changed_fields(&form, &current);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed["postal_code"], "69002");
    }

    #[test]
    fn founded_year_normalizes_before_compare() {
        let current = profile();
        let mut form = ProfileForm::from_profile(&current);

        // same year, different text: still 2019-01-01 on both sides
        form.founded_year = " 2019 ".to_string();
        assert!(changed_fields(&form, &current).is_empty());

        form.founded_year = "2020".to_string();
        let changed = changed_fields(&form, &current);
        assert_eq!(changed["founded_date"], "2020-01-01");
    }

    #[test]
    fn clearing_one_social_link_submits_only_that_platform() {
        let current = profile();
        let mut form = ProfileForm::from_profile(&current);
        form.twitter_url = String::new();

        let changed = changed_fields(&form, &current);
        assert_eq!(changed.len(), 1);
        let social = changed["social_links"].as_object().unwrap();
        assert_eq!(social.len(), 1);
        assert_eq!(social["twitter"], "");
        assert!(!social.contains_key("linkedin"));
    }

    #[test]
    fn new_social_link_nests_under_social_links() {
        let current = profile();
        let mut form = ProfileForm::from_profile(&current);
        form.instagram_url = "https://instagram.com/acme".to_string();

        let changed = changed_fields(&form, &current);
        let social = changed["social_links"].as_object().unwrap();
        assert_eq!(social["instagram"], "https://instagram.com/acme");
    }

    #[test]
    fn multiple_edits_key_by_backend_names() {
        let current = profile();
        let mut form = ProfileForm::from_profile(&current);
        form.name = "Acme Industries".to_string();
        form.size = "51-200".to_string();

        let changed = changed_fields(&form, &current);
        assert_eq!(changed["company_name"], "Acme Industries");
        assert_eq!(changed["company_size"], "51-200");
        assert!(!changed.contains_key("name"));
        assert!(!changed.contains_key("size"));
    }
}
