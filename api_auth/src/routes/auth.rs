use actix_web::{Responder, get, post, web};
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use common::jwt::{self, ClaimsSpec};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::dtos::auth::{
    AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, UserView, VerifyEmailQuery,
    VerifyMobileRequest,
};
use crate::services;
use crate::services::identity::IdentityProvider;

/// Registers a new user with email and password authentication.
///
/// # Input
/// - `req`: JSON payload with email, password, full_name, gender, mobile_no
/// - `pool`: Database connection pool
/// - `identity`: Identity-provisioning capability
///
/// # Output
/// - Success: 201 Created with the new user id
/// - Error: 400 Bad Request when validation fails or the email exists
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/register', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({
///     email: 'user@example.com',
///     password: 'Passw0rd!',
///     full_name: 'Jane Doe',
///     gender: 'f',
///     mobile_no: '+12025550123',
///     signup_type: 'e'
///   })
/// });
/// ```
#[post("/register")]
pub async fn post_register(
    req: web::Json<RegisterRequest>,
    pool: web::Data<Arc<PgPool>>,
    identity: web::Data<dyn IdentityProvider>,
) -> Res<impl Responder> {
    req.validate()?;
    req.validate_extra()?;

    let user = services::auth::register_user(&pool, identity.get_ref(), &req).await?;

    Success::created(
        "User registered successfully. Please verify mobile OTP.",
        RegisterResponse { user_id: user.id },
    )
}

/// Authenticates a user with email and password.
///
/// # Input
/// - `login_data`: JSON payload containing email and password
/// - `config`: Application configuration for JWT generation
/// - `pool`: Database connection pool
///
/// # Output
/// - Success: token plus a sanitized user view (no password hash)
/// - Error: 401 Unauthorized for invalid credentials, identical message
///   whether the email or the password was wrong
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/login', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ email: 'user@example.com', password: 'Passw0rd!' })
/// });
/// const { data } = await response.json();
/// localStorage.setItem('authToken', data.token);
/// ```
#[post("/login")]
pub async fn post_login(
    login_data: web::Json<LoginRequest>,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    login_data.validate()?;

    let user = services::auth::authenticate_user(&pool, &login_data).await?;
    let token = jwt::generate_jwt(
        ClaimsSpec {
            id: user.id,
            email: user.email.clone(),
        },
        &config.jwt_config,
    )?;

    Success::ok(
        "Login successful",
        AuthResponse {
            token,
            user: UserView::from_user(&user),
        },
    )
}

/// Marks a user's email address as verified.
#[get("/verify-email")]
pub async fn get_verify_email(
    query: web::Query<VerifyEmailQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let user_id = query
        .user_id
        .as_deref()
        .and_then(|raw| raw.parse::<i32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;

    services::auth::verify_email(&pool, user_id).await?;
    Success::message("Email verified")
}

/// Marks a user's mobile number as verified.
///
/// The `otp` value is accepted but not checked against any stored code;
/// the delivery/check half of the OTP flow was never built.
#[post("/verify-mobile")]
pub async fn post_verify_mobile(
    req: web::Json<VerifyMobileRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let _ = &req.otp;
    services::auth::verify_mobile(&pool, req.user_id).await?;
    Success::message("Mobile verified")
}
