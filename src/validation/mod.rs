//! Declarative form schemas.
//!
//! Every form the console submits is a `validator` schema. A failed check
//! yields [`FieldErrors`], which screens render inline and which blocks
//! submission.

pub mod appointment;
pub mod auth;
pub mod resources;
pub mod scan;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

pub use appointment::{AppointmentForm, AppointmentPayload, ScanLinePayload};
pub use auth::{
    ChangePasswordForm, ForgotPasswordForm, LoginForm, ProfileForm, RegisterForm,
    ResetPasswordForm,
};
pub use resources::{
    BranchDraft, DoctorDraft, PatientDraft, PatientHistoryDraft, PrivilegeGrant,
    RadiologistDraft, RepresentativeDraft, ScanCategoryDraft, StockDraft, UserDraft,
};
pub use scan::{ScanItemPayload, ScanPayload};

/// Exactly ten digits.
pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").unwrap());

/// Six-digit one-time code.
pub static OTP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").unwrap());

/// Create and edit differ for a few schemas (required-on-creation fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit,
}

/// A submittable form.
pub trait Schema: Validate {
    /// Field validation plus any mode-specific rules.
    fn check(&self, mode: Mode) -> Result<(), FieldErrors> {
        let _ = mode;
        check(self)
    }
}

/// Run the derived validation and collect messages per field.
pub fn check<T: Validate + ?Sized>(value: &T) -> Result<(), FieldErrors> {
    value.validate().map_err(FieldErrors::from)
}

// ═══════════════════════════════════════════════════════════
// FieldErrors
// ═══════════════════════════════════════════════════════════

/// Messages keyed by field name. Nested fields use dotted keys
/// (`address.city`, `items[0].quantity`).
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// First message for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field)?.first().map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Merge `other` under `prefix` (`items[0]` + `item` → `items[0].item`).
    pub fn nest(&mut self, prefix: &str, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0
                .entry(format!("{prefix}.{field}"))
                .or_default()
                .extend(messages);
        }
    }

    /// `Ok` when nothing was collected.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn collect(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let key = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{prefix}.{field}")
            };
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for error in list {
                        self.add(&key, &describe(error));
                    }
                }
                ValidationErrorsKind::Struct(inner) => self.collect(&key, inner),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.collect(&format!("{key}[{index}]"), inner);
                    }
                }
            }
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        out.collect("", &errors);
        out
    }
}

/// Message for one failed rule: the schema's own message, else one
/// derived from the rule code and its parameters.
fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| error.params.get(name).map(|v| v.to_string());
    match error.code.as_ref() {
        "required" => "This field is required".into(),
        "email" => "Invalid email address".into(),
        "must_match" => "Passwords do not match".into(),
        "regex" => "Invalid format".into(),
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Must be between {min} and {max} characters"),
            (Some(min), None) => format!("Must be at least {min} characters"),
            (None, Some(max)) => format!("Must be at most {max} characters"),
            _ => "Invalid length".into(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Must be between {min} and {max}"),
            (Some(min), None) => format!("Must be at least {min}"),
            (None, Some(max)) => format!("Must be at most {max}"),
            _ => "Out of range".into(),
        },
        other => other.replace('_', " "),
    }
}

// ═══════════════════════════════════════════════════════════
// Shared rules
// ═══════════════════════════════════════════════════════════

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Date of birth and similar: strictly before today.
pub fn past_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date < Utc::now().date_naive() {
        Ok(())
    } else {
        Err(rule("past_date", "Date must be in the past"))
    }
}

/// Expiry dates at creation: strictly after today.
pub fn future_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        Ok(())
    } else {
        Err(rule("future_date", "Date must be in the future"))
    }
}

/// Keep only digits, at most six: what the code input accepts.
pub fn sanitize_code(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).take(6).collect()
}

pub fn is_valid_code(code: &str) -> bool {
    OTP_RE.is_match(code)
}
