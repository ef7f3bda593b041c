use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::{dtos::user::UserCreateRequest, models::user::User};

pub async fn exists_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: i32,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: UserCreateRequest,
) -> Res<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password, full_name, gender, mobile_no, signup_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(data.email)
    .bind(data.password_hash)
    .bind(data.full_name)
    .bind(data.gender)
    .bind(data.mobile_no)
    .bind(data.signup_type)
    .fetch_one(executor)
    .await
    .map_err(|err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Email already registered".to_string())
        }
        _ => AppError::from(err),
    })
}

pub async fn set_email_verified<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: i32,
    value: bool,
) -> Res<()> {
    let result =
        sqlx::query("UPDATE users SET is_email_verified = $1, updated_at = NOW() WHERE id = $2")
            .bind(value)
            .bind(user_id)
            .execute(executor)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
}

pub async fn set_mobile_verified<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: i32,
    value: bool,
) -> Res<()> {
    let result =
        sqlx::query("UPDATE users SET is_mobile_verified = $1, updated_at = NOW() WHERE id = $2")
            .bind(value)
            .bind(user_id)
            .execute(executor)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
}
