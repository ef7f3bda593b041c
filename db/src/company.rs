use common::error::{AppError, Res};
use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    dtos::company::{ColumnValue, CompanyCreateRequest, CompanyUpdateSet},
    models::company::CompanyProfile,
};

pub async fn get_company_by_owner<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner_id: i32,
) -> Res<Option<CompanyProfile>> {
    sqlx::query_as::<_, CompanyProfile>("SELECT * FROM company_profile WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Inserts the single profile row for an owner. The UNIQUE constraint on
/// `owner_id` is authoritative for the one-profile-per-owner invariant, so
/// a lost race against a concurrent create surfaces here as `Conflict`.
pub async fn insert_company<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner_id: i32,
    data: CompanyCreateRequest,
) -> Res<CompanyProfile> {
    sqlx::query_as::<_, CompanyProfile>(
        r#"
        INSERT INTO company_profile
          (owner_id, company_name, address, city, state, country, postal_code, website,
           logo_url, banner_url, industry, founded_date, description, social_links,
           company_size, email, phone, mission, vision, founding_story)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(data.company_name)
    .bind(data.address)
    .bind(data.city)
    .bind(data.state)
    .bind(data.country)
    .bind(data.postal_code)
    .bind(data.website)
    .bind(data.logo_url)
    .bind(data.banner_url)
    .bind(data.industry)
    .bind(data.founded_date)
    .bind(data.description)
    .bind(data.social_links)
    .bind(data.company_size)
    .bind(data.email)
    .bind(data.phone)
    .bind(data.mission)
    .bind(data.vision)
    .bind(data.founding_story)
    .fetch_one(executor)
    .await
    .map_err(|err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Company already exists for this user".to_string())
        }
        _ => AppError::from(err),
    })
}

/// Applies a partial update built by the service layer. An empty update set
/// degenerates to a read. Zero affected rows means the profile vanished
/// between the service's existence check and this statement.
pub async fn update_company_by_owner<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner_id: i32,
    updates: CompanyUpdateSet,
) -> Res<CompanyProfile> {
    if updates.is_empty() {
        return get_company_by_owner(executor, owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company profile not found".to_string()));
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE company_profile SET ");

    let mut first = true;
    for (column, value) in updates.fields {
        if !first {
            builder.push(", ");
        }
        first = false;

        builder.push(column);
        builder.push(" = ");
        match value {
            ColumnValue::Text(text) => {
                builder.push_bind(text);
            }
            ColumnValue::Date(date) => {
                builder.push_bind(date);
            }
            ColumnValue::Json(json) => {
                builder.push_bind(json);
            }
        }
    }

    builder.push(", updated_at = NOW() WHERE owner_id = ");
    builder.push_bind(owner_id);
    builder.push(" RETURNING *");

    builder
        .build_query_as::<CompanyProfile>()
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Company profile not found".to_string()))
}
