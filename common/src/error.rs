use actix_web::HttpResponse;
use thiserror::Error;
use validator::ValidationErrors;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    // === APPLICATION ERRORS ===
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Duplicate email or duplicate profile. The API contract renders
    /// conflicts as 400, not 409.
    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_json = |err_msg: &str| {
            if is_dev {
                serde_json::json!({ "success": false, "message": err_msg })
            } else {
                serde_json::json!({ "success": false, "message": "Internal server error" })
            }
        };

        let fail = |message: &str| serde_json::json!({ "success": false, "message": message });

        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::Jwt(error) => {
                log::error!("JWT error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::Reqwest(error) => {
                log::error!("Reqwest error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }

            // === APPLICATION ERRORS ===
            AppError::Unauthorized(message) => HttpResponse::Unauthorized().json(fail(message)),
            AppError::Forbidden(message) => HttpResponse::Forbidden().json(fail(message)),
            AppError::NotFound(message) => HttpResponse::NotFound().json(fail(message)),
            AppError::BadRequest(message) => HttpResponse::BadRequest().json(fail(message)),
            AppError::Conflict(message) => HttpResponse::BadRequest().json(fail(message)),
            AppError::Validation { message, details } => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "success": false,
                    "message": message,
                    "details": details,
                }))
            }
            AppError::ServiceUnavailable(message) => {
                log::error!("Service unavailable: {}", message);
                HttpResponse::ServiceUnavailable().json(fail(message))
            }
            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        details.sort();

        AppError::Validation {
            message: "Validation failed".to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn conflict_renders_as_bad_request() {
        let res = AppError::Conflict("Email already registered".to_string()).to_http_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_and_unauthorized_statuses() {
        let res = AppError::NotFound("nope".to_string()).to_http_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = AppError::Unauthorized("Invalid credentials".to_string()).to_http_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_errors_collect_field_details() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "email",
            validator::ValidationError::new("email").with_message("Email must be valid".into()),
        );
        let err = AppError::from(errors);
        match err {
            AppError::Validation { message, details } => {
                assert_eq!(message, "Validation failed");
                assert_eq!(details, vec!["email: Email must be valid".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
