use actix_multipart::Multipart;
use actix_web::{HttpRequest, Responder, http::header, post, put, web};
use common::error::{AppError, Res};
use common::http::Success;
use common::jwt::JwtClaims;
use futures::StreamExt;
use sqlx::PgPool;
use std::sync::Arc;

use crate::dtos::company::{AssetUploadResponse, FilePathRequest};
use crate::services;
use crate::services::assets::{ImageHost, UploadSource};
use crate::services::profile::AssetKind;

/// Mirror of the upload-parsing limits: images only, 5 MB cap, enforced
/// while draining the stream and before any service call.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const MAX_JSON_BYTES: usize = 2 * 1024 * 1024;

/// Uploads a logo and attaches it to the profile, creating a placeholder
/// profile first when none exists. Accepts either a multipart `logo` file
/// or a JSON body with `filePath`.
#[post("/upload-logo")]
pub async fn post_upload_logo(
    req: HttpRequest,
    payload: web::Payload,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    host: web::Data<dyn ImageHost>,
) -> Res<impl Responder> {
    let source = extract_upload(&req, payload, "logo").await?;
    let (url, company) = services::profile::attach_asset(
        &pool,
        &claims,
        host.get_ref(),
        AssetKind::Logo,
        source,
        true,
    )
    .await?;
    Success::ok("Logo uploaded", AssetUploadResponse { url, company })
}

/// Uploads a banner; otherwise identical to the logo upload.
#[post("/upload-banner")]
pub async fn post_upload_banner(
    req: HttpRequest,
    payload: web::Payload,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    host: web::Data<dyn ImageHost>,
) -> Res<impl Responder> {
    let source = extract_upload(&req, payload, "banner").await?;
    let (url, company) = services::profile::attach_asset(
        &pool,
        &claims,
        host.get_ref(),
        AssetKind::Banner,
        source,
        true,
    )
    .await?;
    Success::ok("Banner uploaded", AssetUploadResponse { url, company })
}

/// Replaces the logo of an existing profile. Multipart only; 404 when no
/// profile exists (no auto-create on the edit path).
#[put("/edit-logo")]
pub async fn put_edit_logo(
    req: HttpRequest,
    payload: web::Payload,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    host: web::Data<dyn ImageHost>,
) -> Res<impl Responder> {
    let source = extract_multipart_file(&req, payload, "logo").await?;
    let (url, company) = services::profile::attach_asset(
        &pool,
        &claims,
        host.get_ref(),
        AssetKind::Logo,
        source,
        false,
    )
    .await?;
    Success::ok("Logo updated successfully", AssetUploadResponse { url, company })
}

/// Replaces the banner of an existing profile.
#[put("/edit-banner")]
pub async fn put_edit_banner(
    req: HttpRequest,
    payload: web::Payload,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    host: web::Data<dyn ImageHost>,
) -> Res<impl Responder> {
    let source = extract_multipart_file(&req, payload, "banner").await?;
    let (url, company) = services::profile::attach_asset(
        &pool,
        &claims,
        host.get_ref(),
        AssetKind::Banner,
        source,
        false,
    )
    .await?;
    Success::ok("Banner updated successfully", AssetUploadResponse { url, company })
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

fn capitalize(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Pulls the upload out of the request: the named multipart file field, or
/// a JSON `filePath` body as the remote-source alternative.
async fn extract_upload(
    req: &HttpRequest,
    payload: web::Payload,
    field_name: &str,
) -> Res<UploadSource> {
    if is_multipart(req) {
        return read_multipart_field(req, payload, field_name).await;
    }

    let body = read_body(payload, MAX_JSON_BYTES).await?;
    let missing = || AppError::BadRequest(format!("{} file or filePath required", capitalize(field_name)));

    if body.is_empty() {
        return Err(missing());
    }

    let parsed: FilePathRequest = serde_json::from_slice(&body).map_err(|_| missing())?;
    let path = parsed.file_path.trim().to_string();
    if path.is_empty() {
        return Err(missing());
    }

    Ok(UploadSource::Remote(path))
}

/// Edit variant: only a multipart file is acceptable.
async fn extract_multipart_file(
    req: &HttpRequest,
    payload: web::Payload,
    field_name: &str,
) -> Res<UploadSource> {
    if !is_multipart(req) {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    }

    match read_multipart_field(req, payload, field_name).await {
        Ok(source) => Ok(source),
        Err(AppError::BadRequest(message)) if message.ends_with("filePath required") => {
            Err(AppError::BadRequest("No file uploaded".to_string()))
        }
        Err(err) => Err(err),
    }
}

async fn read_multipart_field(
    req: &HttpRequest,
    payload: web::Payload,
    field_name: &str,
) -> Res<UploadSource> {
    let mut multipart = Multipart::new(req.headers(), payload);

    while let Some(item) = multipart.next().await {
        let mut field = item
            .map_err(|err| AppError::BadRequest(format!("Malformed multipart payload: {err}")))?;

        if field.name().unwrap_or_default() != field_name {
            // drain and ignore unrelated fields
            while let Some(chunk) = field.next().await {
                chunk.map_err(|err| {
                    AppError::BadRequest(format!("Malformed multipart payload: {err}"))
                })?;
            }
            continue;
        }

        let mime = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_default();
        if !mime.starts_with("image/") {
            return Err(AppError::BadRequest(
                "Only image files are allowed".to_string(),
            ));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|err| {
                AppError::BadRequest(format!("Malformed multipart payload: {err}"))
            })?;
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::BadRequest(
                    "File too large (5MB limit)".to_string(),
                ));
            }
            data.extend_from_slice(&chunk);
        }

        log::debug!("received {field_name} upload ({} bytes, {mime})", data.len());
        return Ok(UploadSource::Buffer { data, mime });
    }

    Err(AppError::BadRequest(format!(
        "{} file or filePath required",
        capitalize(field_name)
    )))
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Res<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|err| AppError::BadRequest(format!("Failed to read request body: {err}")))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::BadRequest("Request body too large".to_string()));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_capitalize_for_error_messages() {
        assert_eq!(capitalize("logo"), "Logo");
        assert_eq!(capitalize("banner"), "Banner");
    }
}
