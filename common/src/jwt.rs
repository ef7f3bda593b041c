use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub id: i32,
    pub email: String,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub id: i32,
    pub email: String,
}

/// Generates a bearer token embedding the user id and email.
/// Validity is signature-plus-expiry only; there is no revocation list.
pub fn generate_jwt(spec: ClaimsSpec, config: &JwtConfig) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(config.expiration_days))
        .expect("valid timestamp")
        .timestamp();

    let claims = JwtClaims {
        id: spec.id,
        email: spec.email,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims from a bearer token.
/// Requires the signing secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret".to_string(),
            expiration_days: 90,
        }
    }

    #[test]
    fn token_round_trips_id_and_email() {
        let config = test_config();
        let token = generate_jwt(
            ClaimsSpec {
                id: 42,
                email: "a@x.com".to_string(),
            },
            &config,
        )
        .unwrap();

        let claims = validate_jwt(&token, &config.secret).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let token = generate_jwt(
            ClaimsSpec {
                id: 1,
                email: "a@x.com".to_string(),
            },
            &config,
        )
        .unwrap();

        assert!(validate_jwt(&token, "wrong_secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = JwtClaims {
            id: 1,
            email: "a@x.com".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret"),
        )
        .unwrap();

        assert!(validate_jwt(&token, "test_secret").is_err());
    }
}
