use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use common::{
    env_config::CloudinaryConfig,
    error::{AppError, Res},
};
use serde::Deserialize;
use sha1::{Digest, Sha1};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// An image to hand to the external host: either bytes received over
/// multipart or a remote URL/path the host fetches itself.
pub enum UploadSource {
    Buffer { data: Vec<u8>, mime: String },
    Remote(String),
}

#[derive(Debug, Clone)]
pub struct HostedImage {
    pub url: String,
    pub public_id: String,
}

/// Capability for the external image host. One explicit timeout, no
/// retries; a retry could double-upload assets.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload_buffer(&self, data: Vec<u8>, mime: &str, folder: &str) -> Res<HostedImage>;
    async fn upload_url(&self, source: &str, folder: &str) -> Res<HostedImage>;
}

#[derive(Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct CloudinaryErrorBody {
    error: Option<CloudinaryErrorMessage>,
}

#[derive(Deserialize)]
struct CloudinaryErrorMessage {
    message: String,
}

pub struct CloudinaryHost {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn from_config(config: &CloudinaryConfig) -> Self {
        CloudinaryHost {
            http: reqwest::Client::builder()
                .timeout(UPLOAD_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            config: config.clone(),
        }
    }

    fn ensure_configured(&self) -> Res<()> {
        if !self.config.is_complete() {
            return Err(AppError::ServiceUnavailable(
                "Image host configuration is incomplete".to_string(),
            ));
        }
        Ok(())
    }

    /// Signed-upload signature: SHA-1 over the sorted `key=value` parameter
    /// string with the API secret appended.
    fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
        let to_sign = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn signed_form(&self, folder: &str) -> reqwest::multipart::Form {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = BTreeMap::from([("folder", folder.to_string()), ("timestamp", timestamp.clone())]);
        let signature = Self::sign(&params, &self.config.api_secret);

        reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
    }

    async fn send_upload(&self, form: reqwest::multipart::Form) -> Res<HostedImage> {
        let response = self
            .http
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                self.config.cloud_name
            ))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<CloudinaryErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|err| err.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(AppError::BadRequest(format!(
                "Image upload failed: {message}"
            )));
        }

        let uploaded = response.json::<CloudinaryUploadResponse>().await?;
        Ok(HostedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload_buffer(&self, data: Vec<u8>, mime: &str, folder: &str) -> Res<HostedImage> {
        self.ensure_configured()?;

        let part = reqwest::multipart::Part::bytes(data)
            .file_name("upload")
            .mime_str(mime)?;
        let form = self.signed_form(folder).part("file", part);

        self.send_upload(form).await
    }

    async fn upload_url(&self, source: &str, folder: &str) -> Res<HostedImage> {
        self.ensure_configured()?;

        let form = self.signed_form(folder).text("file", source.to_string());

        self.send_upload(form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_hex_sha1_and_deterministic() {
        let params = BTreeMap::from([
            ("folder", "company-module/logos".to_string()),
            ("timestamp", "1700000000".to_string()),
        ]);

        let first = CloudinaryHost::sign(&params, "secret");
        let second = CloudinaryHost::sign(&params, "secret");

        assert_eq!(first, second);
        assert_eq!(first.len(), 40);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_secret_and_params() {
        let params = BTreeMap::from([
            ("folder", "company-module/logos".to_string()),
            ("timestamp", "1700000000".to_string()),
        ]);

        let base = CloudinaryHost::sign(&params, "secret");
        assert_ne!(base, CloudinaryHost::sign(&params, "other"));

        let other_params = BTreeMap::from([
            ("folder", "company-module/banners".to_string()),
            ("timestamp", "1700000000".to_string()),
        ]);
        assert_ne!(base, CloudinaryHost::sign(&other_params, "secret"));
    }

    #[tokio::test]
    async fn unconfigured_host_refuses_uploads() {
        let host = CloudinaryHost::from_config(&CloudinaryConfig::default());
        let result = host.upload_url("https://example.com/a.png", "company-module/logos").await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }
}
