use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier},
};
use common::error::{AppError, Res};
use common::sanitize::sanitize;
use db::dtos::user::UserCreateRequest;
use db::models::user::User;
use sqlx::PgPool;

use crate::dtos::auth::{LoginRequest, RegisterRequest};
use crate::services::identity::{IdentityProvider, NewIdentity};

/// Shared by the unknown-email and wrong-password branches so a caller
/// cannot tell which check failed.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Internal(format!("Password hashing failed: {err}")))
}

pub fn verify_password(password: &str, stored_hash: &str) -> Res<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|err| AppError::Internal(format!("Stored password hash is invalid: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Registers a new user: duplicate-email check, external identity
/// provisioning, password hash, row insert, in that order. An identity
/// failure aborts before anything is persisted locally.
///
/// # Arguments
///
/// * `pool` - A reference to the database connection pool.
/// * `identity` - The identity-provisioning capability.
/// * `req` - The validated registration payload.
///
/// # Returns
///
/// A `Result` containing the created `User` or an `AppError`.
pub async fn register_user(
    pool: &PgPool,
    identity: &dyn IdentityProvider,
    req: &RegisterRequest,
) -> Res<User> {
    let email = sanitize(&req.email);
    let full_name = sanitize(&req.full_name);
    let mobile_no = sanitize(&req.mobile_no);

    if db::user::exists_user_by_email(pool, &email).await? {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let phone_number = mobile_no.starts_with('+').then(|| mobile_no.clone());
    identity
        .create_user(NewIdentity {
            email: email.clone(),
            password: req.password.clone(),
            phone_number,
        })
        .await?;

    let password_hash = hash_password(&req.password)?;

    db::user::insert_user(
        pool,
        UserCreateRequest {
            email,
            password_hash,
            full_name,
            gender: req.gender.clone(),
            mobile_no,
            signup_type: req.signup_type.clone(),
        },
    )
    .await
}

/// Authenticates an existing user. Unknown email and bad password produce
/// the identical `Unauthorized` error.
///
/// # Arguments
///
/// * `pool` - A reference to the database connection pool.
/// * `login` - The login payload.
///
/// # Returns
///
/// A `Result` containing the `User` or an `AppError`.
pub async fn authenticate_user(pool: &PgPool, login: &LoginRequest) -> Res<User> {
    let email = sanitize(&login.email);

    let user = db::user::get_user_by_email(pool, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if verify_password(&login.password, &user.password)? {
        Ok(user)
    } else {
        Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }
}

pub async fn verify_email(pool: &PgPool, user_id: i32) -> Res<()> {
    db::user::set_email_verified(pool, user_id, true).await
}

pub async fn verify_mobile(pool: &PgPool, user_id: i32) -> Res<()> {
    db::user::set_mobile_verified(pool, user_id, true).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_produces_argon2_phc_string() {
        let hash = hash_password("Passw0rd!").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("Passw0rd!").unwrap();
        assert!(verify_password("Passw0rd!", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("Passw0rd!").unwrap();
        assert!(!verify_password("passw0rd!", &hash).unwrap());
    }

    #[test]
    fn two_hashes_of_same_password_differ() {
        let first = hash_password("Passw0rd!").unwrap();
        let second = hash_password("Passw0rd!").unwrap();
        assert_ne!(first, second);
    }
}
