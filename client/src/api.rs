use std::time::Duration;

use common::error::{AppError, Res};
use db::models::company::CompanyProfile;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};

use crate::diff::{ProfileForm, changed_fields};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub gender: String,
    pub mobile_no: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct RegisterData {
    user_id: i32,
}

#[derive(Debug, serde::Serialize)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub gender: String,
    pub mobile_no: String,
    pub signup_type: String,
}

#[derive(Debug)]
pub enum SaveOutcome {
    Created(CompanyProfile),
    Updated(CompanyProfile),
    /// The diff was empty; no network call was made.
    NoChanges,
}

/// Typed client for the REST API: bearer session plus the profile-save flow
/// with the changed-field diff in front of it.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends the request and unwraps the `{success, message, data}`
    /// envelope, mapping failure statuses onto the shared error taxonomy.
    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Res<Option<T>> {
        let response = self.authorized(req).send().await?;
        let status = response.status();
        let envelope: Envelope<T> = response.json().await?;

        if !status.is_success() || !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(match status.as_u16() {
                401 => AppError::Unauthorized(message),
                404 => AppError::NotFound(message),
                400 => AppError::BadRequest(message),
                503 => AppError::ServiceUnavailable(message),
                _ => AppError::Internal(message),
            });
        }

        Ok(envelope.data)
    }

    async fn send_expecting<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Res<T> {
        self.send(req)
            .await?
            .ok_or_else(|| AppError::Internal("Response is missing its data field".to_string()))
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Res<i32> {
        let req = self.http.post(self.url("/api/auth/register")).json(payload);
        let data: RegisterData = self.send_expecting(req).await?;
        Ok(data.user_id)
    }

    /// Logs in and keeps the bearer token for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Res<LoginData> {
        let req = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        let data: LoginData = self.send_expecting(req).await?;
        self.token = Some(data.token.clone());
        Ok(data)
    }

    pub async fn get_profile(&self) -> Res<Option<CompanyProfile>> {
        let req = self.http.get(self.url("/api/company/profile"));
        self.send(req).await
    }

    pub async fn create_profile(&self, form: &ProfileForm) -> Res<CompanyProfile> {
        let req = self
            .http
            .post(self.url("/api/company/register"))
            .json(&create_payload(form));
        self.send_expecting(req).await
    }

    pub async fn update_profile(&self, changes: &Map<String, Value>) -> Res<CompanyProfile> {
        let req = self
            .http
            .put(self.url("/api/company/profile"))
            .json(changes);
        self.send_expecting(req).await
    }

    /// The wizard's save action: create when no profile exists yet,
    /// otherwise diff against the last known profile and update, or
    /// short-circuit entirely when nothing changed.
    pub async fn save_profile(
        &self,
        form: &ProfileForm,
        current: Option<&CompanyProfile>,
    ) -> Res<SaveOutcome> {
        match current {
            None => Ok(SaveOutcome::Created(self.create_profile(form).await?)),
            Some(current) => {
                let changes = changed_fields(form, current);
                if changes.is_empty() {
                    return Ok(SaveOutcome::NoChanges);
                }
                Ok(SaveOutcome::Updated(self.update_profile(&changes).await?))
            }
        }
    }

    pub async fn upload_logo_path(&self, file_path: &str) -> Res<CompanyProfile> {
        self.upload_path("/api/company/upload-logo", file_path).await
    }

    pub async fn upload_banner_path(&self, file_path: &str) -> Res<CompanyProfile> {
        self.upload_path("/api/company/upload-banner", file_path).await
    }

    async fn upload_path(&self, endpoint: &str, file_path: &str) -> Res<CompanyProfile> {
        #[derive(Deserialize)]
        struct UploadData {
            company: CompanyProfile,
        }

        let req = self
            .http
            .post(self.url(endpoint))
            .json(&json!({ "filePath": file_path }));
        let data: UploadData = self.send_expecting(req).await?;
        Ok(data.company)
    }

    pub async fn upload_logo_bytes(&self, bytes: Vec<u8>, mime: &str) -> Res<CompanyProfile> {
        self.upload_bytes("/api/company/upload-logo", "logo", bytes, mime)
            .await
    }

    pub async fn upload_banner_bytes(&self, bytes: Vec<u8>, mime: &str) -> Res<CompanyProfile> {
        self.upload_bytes("/api/company/upload-banner", "banner", bytes, mime)
            .await
    }

    async fn upload_bytes(
        &self,
        endpoint: &str,
        field: &'static str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Res<CompanyProfile> {
        #[derive(Deserialize)]
        struct UploadData {
            company: CompanyProfile,
        }

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("upload")
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part(field, part);

        let req = self.http.post(self.url(endpoint)).multipart(form);
        let data: UploadData = self.send_expecting(req).await?;
        Ok(data.company)
    }
}

/// Maps the camelCase wizard form onto the backend creation schema.
fn create_payload(form: &ProfileForm) -> Value {
    let mut payload = Map::new();

    let scalar_fields = [
        ("company_name", &form.name),
        ("description", &form.description),
        ("website", &form.website),
        ("industry", &form.industry),
        ("company_size", &form.size),
        ("address", &form.address),
        ("city", &form.city),
        ("state", &form.state),
        ("country", &form.country),
        ("postal_code", &form.zip_code),
        ("founding_story", &form.founding_story),
        ("mission", &form.mission),
        ("vision", &form.vision),
        ("email", &form.email),
        ("phone", &form.phone),
    ];
    for (key, value) in scalar_fields {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            payload.insert(key.to_string(), Value::String(trimmed.to_string()));
        }
    }

    let year = form.founded_year.trim();
    if !year.is_empty() {
        payload.insert(
            "founded_date".to_string(),
            Value::String(format!("{year}-01-01")),
        );
    }

    let mut social = Map::new();
    for (platform, value) in [
        ("linkedin", &form.linkedin_url),
        ("twitter", &form.twitter_url),
        ("facebook", &form.facebook_url),
        ("instagram", &form.instagram_url),
    ] {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            social.insert(platform.to_string(), Value::String(trimmed.to_string()));
        }
    }
    if !social.is_empty() {
        payload.insert("social_links".to_string(), Value::Object(social));
    }

    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_maps_form_names_to_backend_schema() {
        let form = ProfileForm {
            name: "Acme".to_string(),
            zip_code: "69001".to_string(),
            founded_year: "2019".to_string(),
            linkedin_url: "https://linkedin.com/company/acme".to_string(),
            ..Default::default()
        };

        let payload = create_payload(&form);
        assert_eq!(payload["company_name"], "Acme");
        assert_eq!(payload["postal_code"], "69001");
        assert_eq!(payload["founded_date"], "2019-01-01");
        assert_eq!(payload["social_links"]["linkedin"], "https://linkedin.com/company/acme");
        assert!(payload.get("description").is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/health"), "http://localhost:3000/health");
    }
}
