//! Authentication, account and two-factor endpoints under `/auth`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::http::{unwrap_entity, ApiClient, ApiError, Query};
use crate::models::User;
use crate::validation::{
    ChangePasswordForm, ForgotPasswordForm, LoginForm, ProfileForm, RegisterForm,
    ResetPasswordForm,
};

/// Flags a backend may use to ask for a second factor.
const TWO_FACTOR_FLAGS: &[&str] = &["requires2FA", "requiresTwoFactor", "twoFactorRequired"];

/// Token plus profile returned by a completed sign-in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Identifies a sign-in or registration awaiting its one-time code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TwoFactorChallenge {
    #[serde(alias = "_id")]
    pub user_id: Option<String>,
    pub temp_token: Option<String>,
}

/// Enrollment returned by `/auth/2fa/enable`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoFactorSetup {
    pub secret: String,
    #[serde(
        rename = "otpauthUrl",
        alias = "otpauth_url",
        alias = "qrCodeUrl",
        alias = "uri"
    )]
    pub provisioning_uri: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated(AuthSession),
    TwoFactorRequired(TwoFactorChallenge),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    Authenticated(AuthSession),
    /// Account created; the enrollment must be confirmed with a code.
    VerifyTwoFactor {
        challenge: TwoFactorChallenge,
        setup: TwoFactorSetup,
    },
    /// Account created without a session (e.g. awaiting approval).
    Created,
}

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

fn body_of(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Object(_)) => data,
            Some(other) => {
                map.insert("data".into(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn wants_second_factor(body: &Value) -> bool {
    TWO_FACTOR_FLAGS
        .iter()
        .any(|flag| body.get(flag).and_then(Value::as_bool) == Some(true))
}

impl AuthApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    pub async fn login(&self, form: &LoginForm) -> Result<LoginOutcome, ApiError> {
        let body = body_of(self.client.post("/auth/login", form).await?);
        if wants_second_factor(&body) {
            return Ok(LoginOutcome::TwoFactorRequired(serde_json::from_value(body)?));
        }
        Ok(LoginOutcome::Authenticated(serde_json::from_value(body)?))
    }

    /// Complete a sign-in with the one-time code.
    pub async fn login_2fa(&self, challenge: &TwoFactorChallenge, code: &str) -> Result<AuthSession, ApiError> {
        let body = json!({
            "userId": challenge.user_id,
            "tempToken": challenge.temp_token,
            "token": code,
        });
        let value = self.client.post("/auth/login/2fa", &body).await?;
        Ok(serde_json::from_value(body_of(value))?)
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<RegisterOutcome, ApiError> {
        let body = body_of(self.client.post("/auth/register", form).await?);
        if wants_second_factor(&body) {
            let challenge: TwoFactorChallenge = serde_json::from_value(body.clone())?;
            let setup: TwoFactorSetup = serde_json::from_value(body)?;
            return Ok(RegisterOutcome::VerifyTwoFactor { challenge, setup });
        }
        if body.get("token").and_then(Value::as_str).is_some() {
            return Ok(RegisterOutcome::Authenticated(serde_json::from_value(body)?));
        }
        Ok(RegisterOutcome::Created)
    }

    pub async fn verify_registration_2fa(
        &self,
        challenge: &TwoFactorChallenge,
        code: &str,
    ) -> Result<AuthSession, ApiError> {
        let body = json!({
            "userId": challenge.user_id,
            "tempToken": challenge.temp_token,
            "token": code,
        });
        let value = self.client.post("/auth/register/verify-2fa", &body).await?;
        Ok(serde_json::from_value(body_of(value))?)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.post("/auth/logout", &json!({})).await?;
        Ok(())
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: Option<&str>) -> Result<String, ApiError> {
        let value = self
            .client
            .post("/auth/refresh-token", &json!({ "refreshToken": refresh_token }))
            .await?;
        body_of(value)
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode("refresh response without token".into()))
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        let value = self.client.get_value("/auth/me", &Query::new()).await?;
        unwrap_entity(value, "user")
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> Result<User, ApiError> {
        let value = self.client.patch("/auth/me", form).await?;
        unwrap_entity(value, "user")
    }

    pub async fn change_password(&self, form: &ChangePasswordForm) -> Result<(), ApiError> {
        self.client.post("/auth/change-password", form).await?;
        Ok(())
    }

    pub async fn forgot_password(&self, form: &ForgotPasswordForm) -> Result<(), ApiError> {
        self.client.post("/auth/forgot-password", form).await?;
        Ok(())
    }

    pub async fn reset_password(&self, form: &ResetPasswordForm) -> Result<(), ApiError> {
        self.client.post("/auth/reset-password", form).await?;
        Ok(())
    }

    /// Start two-factor enrollment.
    pub async fn enable_2fa(&self) -> Result<TwoFactorSetup, ApiError> {
        let value = self.client.post("/auth/2fa/enable", &json!({})).await?;
        Ok(serde_json::from_value(body_of(value))?)
    }

    /// Confirm enrollment (or verify a code) for the signed-in user.
    pub async fn verify_2fa(&self, code: &str) -> Result<(), ApiError> {
        self.client
            .post("/auth/2fa/verify", &json!({ "token": code }))
            .await?;
        Ok(())
    }

    pub async fn disable_2fa(&self, password: &str, code: &str) -> Result<(), ApiError> {
        self.client
            .post("/auth/2fa/disable", &json!({ "password": password, "token": code }))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;

    fn login_form() -> LoginForm {
        LoginForm {
            username: "mona".into(),
            password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn login_returns_session() {
        let env = TestEnv::start().await;
        env.backend.on(
            "POST",
            "/auth/login",
            200,
            json!({"token": "t1", "user": {"_id": "u1", "username": "mona", "role": "doctor"}}),
        );
        let api = AuthApi::new(&env.client);

        let LoginOutcome::Authenticated(session) = api.login(&login_form()).await.unwrap() else {
            panic!("expected a session");
        };
        assert_eq!(session.token, "t1");
        assert_eq!(session.user.username, "mona");
        assert_eq!(env.backend.last("POST", "/auth/login").json()["username"], "mona");
    }

    #[tokio::test]
    async fn login_surfaces_two_factor_challenge() {
        let env = TestEnv::start().await;
        env.backend.on(
            "POST",
            "/auth/login",
            200,
            json!({"data": {"requires2FA": true, "userId": "u1", "tempToken": "tmp"}}),
        );
        env.backend.on(
            "POST",
            "/auth/login/2fa",
            200,
            json!({"token": "t2", "user": {"_id": "u1", "username": "mona"}}),
        );
        let api = AuthApi::new(&env.client);

        let LoginOutcome::TwoFactorRequired(challenge) = api.login(&login_form()).await.unwrap() else {
            panic!("expected a challenge");
        };
        assert_eq!(challenge.user_id.as_deref(), Some("u1"));

        let session = api.login_2fa(&challenge, "123456").await.unwrap();
        assert_eq!(session.token, "t2");
        let sent = env.backend.last("POST", "/auth/login/2fa").json();
        assert_eq!(sent["token"], "123456");
        assert_eq!(sent["tempToken"], "tmp");
    }

    #[tokio::test]
    async fn register_with_enrollment() {
        let env = TestEnv::start().await;
        env.backend.on(
            "POST",
            "/auth/register",
            201,
            json!({"requires2FA": true, "userId": "u9", "secret": "JBSWY3DP", "otpauthUrl": "otpauth://totp/Clinic:mona?secret=JBSWY3DP"}),
        );
        let api = AuthApi::new(&env.client);
        let form = RegisterForm {
            username: "mona".into(),
            ..RegisterForm::default()
        };

        let outcome = api.register(&form).await.unwrap();
        let RegisterOutcome::VerifyTwoFactor { challenge, setup } = outcome else {
            panic!("expected enrollment");
        };
        assert_eq!(challenge.user_id.as_deref(), Some("u9"));
        assert_eq!(setup.secret, "JBSWY3DP");
        assert!(setup.provisioning_uri.starts_with("otpauth://"));
    }

    #[tokio::test]
    async fn me_and_profile() {
        let env = TestEnv::signed_in().await;
        env.backend.on("GET", "/auth/me", 200, json!({"data": {"_id": "u1", "username": "mona"}}));
        env.backend.on("PATCH", "/auth/me", 200, json!({"user": {"_id": "u1", "fullName": "Mona H"}}));
        let api = AuthApi::new(&env.client);

        assert_eq!(api.me().await.unwrap().username, "mona");
        let updated = api
            .update_profile(&ProfileForm {
                full_name: "Mona H".into(),
                email: "m@clinic.test".into(),
            })
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Mona H");
    }

    #[tokio::test]
    async fn two_factor_endpoints() {
        let env = TestEnv::signed_in().await;
        env.backend.on(
            "POST",
            "/auth/2fa/enable",
            200,
            json!({"secret": "ABC", "qrCodeUrl": "otpauth://totp/x?secret=ABC"}),
        );
        env.backend.on("POST", "/auth/2fa/verify", 200, json!({"message": "ok"}));
        env.backend.on("POST", "/auth/2fa/disable", 200, json!({"message": "ok"}));
        let api = AuthApi::new(&env.client);

        let setup = api.enable_2fa().await.unwrap();
        assert_eq!(setup.provisioning_uri, "otpauth://totp/x?secret=ABC");
        api.verify_2fa("123456").await.unwrap();
        api.disable_2fa("secret1", "654321").await.unwrap();

        let sent = env.backend.last("POST", "/auth/2fa/disable").json();
        assert_eq!(sent["password"], "secret1");
        assert_eq!(sent["token"], "654321");
    }

    #[tokio::test]
    async fn refresh_requires_token_in_response() {
        let env = TestEnv::signed_in().await;
        env.backend.on("POST", "/auth/refresh-token", 200, json!({"data": {"token": "fresh"}}));
        let api = AuthApi::new(&env.client);
        assert_eq!(api.refresh_token(Some("r")).await.unwrap(), "fresh");

        env.backend.on("POST", "/auth/refresh-token", 200, json!({}));
        assert!(matches!(api.refresh_token(None).await, Err(ApiError::Decode(_))));
    }
}
