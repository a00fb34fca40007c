//! Sign-in, registration, password recovery and profile screens.

use crate::api::{RegisterOutcome, TwoFactorChallenge, TwoFactorSetup};
use crate::models::User;
use crate::navigation::Route;
use crate::session::SignIn;
use crate::validation::{
    is_valid_code, sanitize_code, ChangePasswordForm, FieldErrors, ForgotPasswordForm, LoginForm,
    Mode, ProfileForm, RegisterForm, ResetPasswordForm,
};
use crate::widgets::two_factor::render_qr;
use crate::widgets::{SubmitError, TwoFactorDialog, TwoFactorMode};

use super::{validate_into, ScreenContext};

fn code_error(ctx: &ScreenContext) -> SubmitError {
    FieldErrors::single("code", &ctx.locale.t("twoFactor.invalidCode")).into()
}

// ═══════════════════════════════════════════════════════════
// Login
// ═══════════════════════════════════════════════════════════

pub struct LoginScreen {
    ctx: ScreenContext,
    pub form: LoginForm,
    errors: FieldErrors,
    challenge: Option<TwoFactorChallenge>,
    code: String,
}

impl LoginScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            form: LoginForm::default(),
            errors: FieldErrors::new(),
            challenge: None,
            code: String::new(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the one-time code step is showing.
    pub fn awaiting_code(&self) -> bool {
        self.challenge.is_some()
    }

    pub fn set_code(&mut self, input: &str) {
        self.code = sanitize_code(input);
    }

    /// First step. `Ok(None)` means the code step is now showing.
    pub async fn submit(&mut self) -> Result<Option<User>, SubmitError> {
        validate_into(&self.form, Mode::Create, &mut self.errors)?;
        match self.ctx.session.login(&self.form).await {
            Ok(SignIn::Complete(user)) => {
                self.ctx.navigator.replace(Route::Dashboard);
                Ok(Some(user))
            }
            Ok(SignIn::NeedsCode(challenge)) => {
                self.challenge = Some(challenge);
                self.code.clear();
                Ok(None)
            }
            Err(e) => {
                self.ctx
                    .toasts
                    .error(e.user_message(&self.ctx.locale.t("auth.loginFailed")));
                Err(e.into())
            }
        }
    }

    /// Second step.
    pub async fn submit_code(&mut self) -> Result<User, SubmitError> {
        if !is_valid_code(&self.code) {
            return Err(code_error(&self.ctx));
        }
        let Some(challenge) = self.challenge.clone() else {
            return Err(code_error(&self.ctx));
        };
        match self.ctx.session.complete_two_factor(&challenge, &self.code).await {
            Ok(user) => {
                self.challenge = None;
                self.ctx.navigator.replace(Route::Dashboard);
                Ok(user)
            }
            Err(e) => {
                let message = if e.is_rate_limited() {
                    self.ctx.locale.t("twoFactor.rateLimited")
                } else {
                    e.user_message(&self.ctx.locale.t("twoFactor.failed"))
                };
                self.ctx.toasts.error(message);
                Err(e.into())
            }
        }
    }

    /// Leave the code step and start over.
    pub fn back_to_credentials(&mut self) {
        self.challenge = None;
        self.code.clear();
    }
}

// ═══════════════════════════════════════════════════════════
// Register
// ═══════════════════════════════════════════════════════════

pub struct RegisterScreen {
    ctx: ScreenContext,
    pub form: RegisterForm,
    errors: FieldErrors,
    verification: Option<(TwoFactorChallenge, TwoFactorSetup)>,
    qr_svg: Option<String>,
    code: String,
}

impl RegisterScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            form: RegisterForm::default(),
            errors: FieldErrors::new(),
            verification: None,
            qr_svg: None,
            code: String::new(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn awaiting_code(&self) -> bool {
        self.verification.is_some()
    }

    pub fn qr_svg(&self) -> Option<&str> {
        self.qr_svg.as_deref()
    }

    pub fn secret(&self) -> Option<&str> {
        self.verification.as_ref().map(|(_, s)| s.secret.as_str())
    }

    pub fn set_code(&mut self, input: &str) {
        self.code = sanitize_code(input);
    }

    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        validate_into(&self.form, Mode::Create, &mut self.errors)?;
        let outcome = match self.ctx.api.auth.register(&self.form).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.ctx
                    .toasts
                    .error(e.user_message(&self.ctx.locale.t("auth.registerFailed")));
                return Err(e.into());
            }
        };
        match outcome {
            RegisterOutcome::Authenticated(session) => {
                self.ctx.session.establish(session);
                self.ctx.navigator.replace(Route::Dashboard);
            }
            RegisterOutcome::VerifyTwoFactor { challenge, setup } => {
                self.qr_svg = render_qr(&setup.provisioning_uri)
                    .map_err(|e| tracing::warn!(error = %e, "Cannot render provisioning QR"))
                    .ok();
                self.verification = Some((challenge, setup));
            }
            RegisterOutcome::Created => {
                self.ctx.toasts.success(self.ctx.locale.t("auth.registered"));
                self.ctx.navigator.replace(Route::Login);
            }
        }
        Ok(())
    }

    pub async fn submit_code(&mut self) -> Result<User, SubmitError> {
        if !is_valid_code(&self.code) {
            return Err(code_error(&self.ctx));
        }
        let Some((challenge, _)) = self.verification.clone() else {
            return Err(code_error(&self.ctx));
        };
        match self
            .ctx
            .api
            .auth
            .verify_registration_2fa(&challenge, &self.code)
            .await
        {
            Ok(session) => {
                let user = self.ctx.session.establish(session);
                self.verification = None;
                self.qr_svg = None;
                self.ctx.navigator.replace(Route::Dashboard);
                Ok(user)
            }
            Err(e) => {
                let message = if e.is_rate_limited() {
                    self.ctx.locale.t("twoFactor.rateLimited")
                } else {
                    e.user_message(&self.ctx.locale.t("twoFactor.failed"))
                };
                self.ctx.toasts.error(message);
                Err(e.into())
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Password recovery
// ═══════════════════════════════════════════════════════════

pub struct ForgotPasswordScreen {
    ctx: ScreenContext,
    pub form: ForgotPasswordForm,
    errors: FieldErrors,
    sent: bool,
}

impl ForgotPasswordScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            form: ForgotPasswordForm::default(),
            errors: FieldErrors::new(),
            sent: false,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }

    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        validate_into(&self.form, Mode::Create, &mut self.errors)?;
        if let Err(e) = self.ctx.api.auth.forgot_password(&self.form).await {
            self.ctx
                .toasts
                .error(e.user_message(&self.ctx.locale.t("auth.requestFailed")));
            return Err(e.into());
        }
        self.sent = true;
        self.ctx.toasts.success(self.ctx.locale.t("auth.resetSent"));
        Ok(())
    }
}

pub struct ResetPasswordScreen {
    ctx: ScreenContext,
    pub form: ResetPasswordForm,
    errors: FieldErrors,
}

impl ResetPasswordScreen {
    /// `token` comes from the reset link.
    pub fn new(ctx: ScreenContext, token: &str) -> Self {
        Self {
            ctx,
            form: ResetPasswordForm {
                token: token.to_string(),
                ..ResetPasswordForm::default()
            },
            errors: FieldErrors::new(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        validate_into(&self.form, Mode::Create, &mut self.errors)?;
        if let Err(e) = self.ctx.api.auth.reset_password(&self.form).await {
            self.ctx
                .toasts
                .error(e.user_message(&self.ctx.locale.t("auth.requestFailed")));
            return Err(e.into());
        }
        self.ctx.toasts.success(self.ctx.locale.t("auth.passwordReset"));
        self.ctx.navigator.replace(Route::Login);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Profile
// ═══════════════════════════════════════════════════════════

pub struct ProfileScreen {
    ctx: ScreenContext,
    pub profile: ProfileForm,
    pub password: ChangePasswordForm,
    profile_errors: FieldErrors,
    password_errors: FieldErrors,
    two_factor: Option<TwoFactorDialog>,
}

impl ProfileScreen {
    /// Pre-fill from the signed-in user.
    pub fn new(ctx: ScreenContext) -> Self {
        let profile = ctx
            .session
            .user()
            .map(|u| ProfileForm {
                full_name: u.full_name,
                email: u.email,
            })
            .unwrap_or_default();
        Self {
            ctx,
            profile,
            password: ChangePasswordForm::default(),
            profile_errors: FieldErrors::new(),
            password_errors: FieldErrors::new(),
            two_factor: None,
        }
    }

    pub fn profile_errors(&self) -> &FieldErrors {
        &self.profile_errors
    }

    pub fn password_errors(&self) -> &FieldErrors {
        &self.password_errors
    }

    pub async fn save_profile(&mut self) -> Result<User, SubmitError> {
        validate_into(&self.profile, Mode::Edit, &mut self.profile_errors)?;
        match self.ctx.api.auth.update_profile(&self.profile).await {
            Ok(user) => {
                self.ctx.session.set_user(user.clone());
                self.ctx.toasts.success(self.ctx.locale.t("auth.profileUpdated"));
                Ok(user)
            }
            Err(e) => {
                self.ctx
                    .toasts
                    .error(e.user_message(&self.ctx.locale.t("auth.requestFailed")));
                Err(e.into())
            }
        }
    }

    pub async fn change_password(&mut self) -> Result<(), SubmitError> {
        validate_into(&self.password, Mode::Edit, &mut self.password_errors)?;
        if let Err(e) = self.ctx.api.auth.change_password(&self.password).await {
            self.ctx
                .toasts
                .error(e.user_message(&self.ctx.locale.t("auth.requestFailed")));
            return Err(e.into());
        }
        self.password = ChangePasswordForm::default();
        self.ctx.toasts.success(self.ctx.locale.t("auth.passwordChanged"));
        Ok(())
    }

    /// Setup when two-factor is off, disable when it is on.
    pub async fn open_two_factor(&mut self) {
        let enabled = self
            .ctx
            .session
            .user()
            .is_some_and(|u| u.two_factor_enabled);
        let mode = if enabled {
            TwoFactorMode::Disable
        } else {
            TwoFactorMode::Setup
        };
        let dialog = TwoFactorDialog::open(self.ctx.api.auth.clone(), self.ctx.locale.clone(), mode).await;
        self.two_factor = Some(dialog);
    }

    pub fn two_factor(&mut self) -> Option<&mut TwoFactorDialog> {
        self.two_factor.as_mut()
    }

    pub fn close_two_factor(&mut self) {
        self.two_factor = None;
    }

    /// Submit the dialog; on success close it and re-read the profile.
    pub async fn submit_two_factor(&mut self) -> bool {
        let Some(dialog) = self.two_factor.as_mut() else {
            return false;
        };
        let Some(message) = dialog.submit().await else {
            return false;
        };
        self.two_factor = None;
        self.ctx.toasts.success(message);
        if let Err(e) = self.ctx.session.refresh().await {
            tracing::warn!(error = %e, "Profile refresh after two-factor change failed");
        }
        true
    }
}
