//! Authentication and account forms.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Schema;
use crate::models::Role;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Schema for LoginForm {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 3, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(skip_serializing, default)]
    #[validate(must_match = "password")]
    pub confirm_password: String,
    pub role: Role,
}

impl Schema for RegisterForm {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email)]
    pub email: String,
}

impl Schema for ForgotPasswordForm {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[validate(length(min = 1, message = "Reset token is missing"))]
    pub token: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(skip_serializing, default)]
    #[validate(must_match = "password")]
    pub confirm_password: String,
}

impl Schema for ResetPasswordForm {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
    #[serde(skip_serializing, default)]
    #[validate(must_match = "new_password")]
    pub confirm_password: String,
}

impl Schema for ChangePasswordForm {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[validate(length(min = 3, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
}

impl Schema for ProfileForm {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Mode;

    fn register() -> RegisterForm {
        RegisterForm {
            username: "mona".into(),
            full_name: "Mona Hassan".into(),
            email: "mona@clinic.test".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            role: Role::Receptionist,
        }
    }

    #[test]
    fn register_accepts_matching_passwords() {
        assert!(register().check(Mode::Create).is_ok());
    }

    #[test]
    fn register_rejects_mismatch_and_short_password() {
        let mut form = register();
        form.confirm_password = "secret2".into();
        assert!(form.check(Mode::Create).unwrap_err().has("confirm_password"));

        let mut form = register();
        form.password = "abc".into();
        form.confirm_password = "abc".into();
        assert!(form.check(Mode::Create).unwrap_err().has("password"));
    }

    #[test]
    fn register_body_omits_confirmation() {
        let json = serde_json::to_value(register()).unwrap();
        assert!(json.get("confirmPassword").is_none());
        assert_eq!(json["fullName"], "Mona Hassan");
        assert_eq!(json["role"], "receptionist");
    }

    #[test]
    fn invalid_email_is_reported() {
        let form = ForgotPasswordForm {
            email: "not-an-email".into(),
        };
        assert_eq!(
            form.check(Mode::Create).unwrap_err().get("email"),
            Some("Invalid email address")
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().check(Mode::Create).unwrap_err();
        assert_eq!(errors.get("username"), Some("Username is required"));
        assert!(errors.has("password"));
    }
}
