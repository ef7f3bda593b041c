use db::models::user::User;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

fn default_signup_type() -> String {
    "e".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must contain at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    pub gender: String,
    #[validate(length(min = 8, max = 20, message = "Mobile number must be 8 to 20 characters"))]
    pub mobile_no: String,
    #[serde(default = "default_signup_type")]
    pub signup_type: String,
}

impl RegisterRequest {
    /// Rules the derive cannot express: password strength, gender code,
    /// signup channel.
    pub fn validate_extra(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.password.chars().any(|c| !c.is_alphanumeric()) {
            errors.add(
                "password",
                ValidationError::new("symbol")
                    .with_message("Password must contain at least 1 symbol".into()),
            );
        }

        if !matches!(self.gender.as_str(), "m" | "f" | "o") {
            errors.add(
                "gender",
                ValidationError::new("gender")
                    .with_message("Gender must be one of m, f, o".into()),
            );
        }

        if self.signup_type != "e" {
            errors.add(
                "signup_type",
                ValidationError::new("signup_type")
                    .with_message("Signup type must be 'e'".into()),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must contain at least 6 characters"))]
    pub password: String,
}

/// User data returned to clients. The stored full name is split into
/// first/last at this boundary only, never persisted split.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub gender: String,
    pub mobile_no: String,
}

impl UserView {
    pub fn from_user(user: &User) -> Self {
        let mut parts = user.full_name.split_whitespace();
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");

        UserView {
            id: user.id,
            email: user.email.clone(),
            first_name,
            last_name,
            full_name: user.full_name.clone(),
            gender: user.gender.clone(),
            mobile_no: user.mobile_no.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyMobileRequest {
    pub user_id: i32,
    pub otp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".to_string(),
            password: "Passw0rd!".to_string(),
            full_name: "Alice A".to_string(),
            gender: "f".to_string(),
            mobile_no: "+12025550123".to_string(),
            signup_type: "e".to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        let req = valid_register();
        assert!(req.validate().is_ok());
        assert!(req.validate_extra().is_ok());
    }

    #[test]
    fn short_password_fails() {
        let req = RegisterRequest {
            password: "Ab1!".to_string(),
            ..valid_register()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn symbol_less_password_fails_extra_checks() {
        let req = RegisterRequest {
            password: "Password1".to_string(),
            ..valid_register()
        };
        assert!(req.validate().is_ok());
        assert!(req.validate_extra().is_err());
    }

    #[test]
    fn unknown_gender_fails() {
        let req = RegisterRequest {
            gender: "x".to_string(),
            ..valid_register()
        };
        assert!(req.validate_extra().is_err());
    }

    #[test]
    fn mobile_length_bounds() {
        let short = RegisterRequest {
            mobile_no: "1234567".to_string(),
            ..valid_register()
        };
        assert!(short.validate().is_err());

        let long = RegisterRequest {
            mobile_no: "1".repeat(21),
            ..valid_register()
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn wrong_signup_type_fails() {
        let req = RegisterRequest {
            signup_type: "g".to_string(),
            ..valid_register()
        };
        assert!(req.validate_extra().is_err());
    }

    #[test]
    fn user_view_splits_full_name() {
        let user = User {
            id: 1,
            email: "a@x.com".to_string(),
            password: "hash".to_string(),
            full_name: "Alice Anne Smith".to_string(),
            gender: "f".to_string(),
            mobile_no: "+12025550123".to_string(),
            signup_type: "e".to_string(),
            is_email_verified: false,
            is_mobile_verified: false,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let view = UserView::from_user(&user);
        assert_eq!(view.first_name, "Alice");
        assert_eq!(view.last_name, "Anne Smith");
        assert_eq!(view.full_name, "Alice Anne Smith");
    }

    #[test]
    fn user_view_serializes_camel_case_without_password() {
        let user = User {
            id: 7,
            email: "a@x.com".to_string(),
            password: "secret-hash".to_string(),
            full_name: "Alice".to_string(),
            gender: "f".to_string(),
            mobile_no: "12345678".to_string(),
            signup_type: "e".to_string(),
            is_email_verified: false,
            is_mobile_verified: false,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let json = serde_json::to_string(&UserView::from_user(&user)).unwrap();
        assert!(json.contains("\"firstName\""));
        assert!(json.contains("\"mobileNo\""));
        assert!(!json.contains("secret-hash"));
    }
}
