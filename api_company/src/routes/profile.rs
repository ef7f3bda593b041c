use actix_web::{Responder, get, post, put, web};
use common::error::Res;
use common::http::Success;
use common::jwt::JwtClaims;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::dtos::company::{RegisterCompanyRequest, UpdateCompanyRequest};
use crate::services;

/// Creates the company profile for the authenticated user.
///
/// # Input
/// - `req`: JSON payload with the required company fields
/// - `claims`: The JWT claims of the authenticated user
/// - `pool`: Database connection pool
///
/// # Output
/// - Success: 201 Created with the persisted profile
/// - Error: 400 Bad Request when a profile already exists or validation fails
///
/// # Frontend Example
/// ```javascript
/// await fetch('/api/company/register', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${token}`
///   },
///   body: JSON.stringify({
///     company_name: 'Acme',
///     address: '1 Road',
///     city: 'Lyon',
///     state: 'ARA',
///     country: 'France',
///     postal_code: '69001',
///     industry: 'Technology'
///   })
/// });
/// ```
#[post("/register")]
pub async fn post_register(
    req: web::Json<RegisterCompanyRequest>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    req.validate()?;
    req.validate_extra()?;

    let company =
        services::profile::register_company(&pool, &claims, req.into_inner()).await?;
    Success::created("Company created", company)
}

/// Returns the authenticated user's profile, or `null` when none exists.
#[get("/profile")]
pub async fn get_profile(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let company = services::profile::get_profile(&pool, &claims).await?;
    Success::data(company)
}

/// Applies a partial update to the profile. Only provided fields are
/// touched; social links merge key-by-key.
#[put("/profile")]
pub async fn put_profile(
    req: web::Json<UpdateCompanyRequest>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    req.validate()?;
    req.validate_extra()?;

    let company = services::profile::update_profile(&pool, &claims, req.into_inner()).await?;
    Success::ok("Company updated", company)
}
