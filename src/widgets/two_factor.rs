//! Two-factor dialog: enrollment, verification and disabling.
//!
//! Setup enrolls as soon as the dialog opens and shows the provisioning
//! URI as a QR code plus the shared secret. Rate-limit replies get their
//! own message; any other setup failure drops the QR so the user can retry.

use base64::Engine;
use qrcode::render::svg;
use qrcode::QrCode;

use crate::api::{AuthApi, TwoFactorSetup};
use crate::http::ApiError;
use crate::i18n::LocaleContext;
use crate::validation::{is_valid_code, sanitize_code};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFactorMode {
    Setup,
    Verify,
    Disable,
}

/// Render a provisioning URI as an SVG QR code.
pub fn render_qr(uri: &str) -> Result<String, String> {
    let code = QrCode::new(uri.as_bytes()).map_err(|e| format!("QR generation failed: {e}"))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .max_dimensions(300, 300)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .quiet_zone(true)
        .build())
}

pub struct TwoFactorDialog {
    mode: TwoFactorMode,
    auth: AuthApi,
    locale: LocaleContext,
    setup: Option<TwoFactorSetup>,
    qr_svg: Option<String>,
    code: String,
    password: String,
    error: Option<String>,
    busy: bool,
    done: bool,
}

impl TwoFactorDialog {
    /// Open the dialog. In setup mode this enrolls immediately.
    pub async fn open(auth: AuthApi, locale: LocaleContext, mode: TwoFactorMode) -> Self {
        let mut dialog = Self {
            mode,
            auth,
            locale,
            setup: None,
            qr_svg: None,
            code: String::new(),
            password: String::new(),
            error: None,
            busy: false,
            done: false,
        };
        if mode == TwoFactorMode::Setup {
            dialog.start_setup().await;
        }
        dialog
    }

    /// (Re)run enrollment.
    pub async fn start_setup(&mut self) {
        self.busy = true;
        self.error = None;
        match self.auth.enable_2fa().await {
            Ok(setup) => {
                self.qr_svg = match render_qr(&setup.provisioning_uri) {
                    Ok(svg) => Some(svg),
                    Err(e) => {
                        tracing::warn!(error = %e, "Cannot render provisioning QR");
                        None
                    }
                };
                self.setup = Some(setup);
            }
            Err(e) if e.is_rate_limited() => {
                self.error = Some(self.locale.t("twoFactor.rateLimited"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Two-factor enrollment failed");
                self.setup = None;
                self.qr_svg = None;
                self.error = Some(e.user_message(&self.locale.t("twoFactor.setupFailed")));
            }
        }
        self.busy = false;
    }

    pub fn mode(&self) -> TwoFactorMode {
        self.mode
    }

    pub fn qr_svg(&self) -> Option<&str> {
        self.qr_svg.as_deref()
    }

    /// The QR as an `<img src>` value.
    pub fn qr_data_uri(&self) -> Option<String> {
        self.qr_svg.as_ref().map(|svg| {
            format!(
                "data:image/svg+xml;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(svg.as_bytes())
            )
        })
    }

    /// Shared secret for manual entry.
    pub fn secret(&self) -> Option<&str> {
        self.setup.as_ref().map(|s| s.secret.as_str())
    }

    /// Code input: digits only, at most six.
    pub fn set_code(&mut self, input: &str) {
        self.code = sanitize_code(input);
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    pub fn needs_password(&self) -> bool {
        self.mode == TwoFactorMode::Disable
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn can_submit(&self) -> bool {
        !self.busy
            && is_valid_code(&self.code)
            && (!self.needs_password() || !self.password.is_empty())
            && (self.mode != TwoFactorMode::Setup || self.setup.is_some())
    }

    /// Submit the code. Returns the success message.
    pub async fn submit(&mut self) -> Option<String> {
        if !is_valid_code(&self.code) {
            self.error = Some(self.locale.t("twoFactor.invalidCode"));
            return None;
        }
        if self.needs_password() && self.password.is_empty() {
            self.error = Some(self.locale.t("twoFactor.passwordRequired"));
            return None;
        }

        self.busy = true;
        self.error = None;
        let result = match self.mode {
            TwoFactorMode::Setup | TwoFactorMode::Verify => self.auth.verify_2fa(&self.code).await,
            TwoFactorMode::Disable => self.auth.disable_2fa(&self.password, &self.code).await,
        };
        self.busy = false;

        match result {
            Ok(()) => {
                self.done = true;
                let key = match self.mode {
                    TwoFactorMode::Setup => "twoFactor.enabled",
                    TwoFactorMode::Verify => "twoFactor.verified",
                    TwoFactorMode::Disable => "twoFactor.disabled",
                };
                tracing::info!(mode = ?self.mode, "Two-factor step completed");
                Some(self.locale.t(key))
            }
            Err(e) => {
                self.error = Some(self.failure_message(&e));
                None
            }
        }
    }

    fn failure_message(&self, err: &ApiError) -> String {
        if err.is_rate_limited() {
            self.locale.t("twoFactor.rateLimited")
        } else {
            err.user_message(&self.locale.t("twoFactor.failed"))
        }
    }
}
