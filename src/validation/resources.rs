//! Create/edit schemas for the directory resources.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{check, future_date, past_date, FieldErrors, Mode, Schema, PHONE_RE};
use crate::models::{
    Address, Branch, Doctor, Gender, Patient, PatientHistoryEntry, Privilege, Radiologist,
    Representative, Role, ScanCategory, StockItem, User,
};

/// Country pre-filled on new doctor addresses.
pub const DEFAULT_DOCTOR_COUNTRY: &str = "Egypt";

fn default_true() -> bool {
    true
}

// ═══════════════════════════════════════════════════════════
// Patient
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(required, custom = "past_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[validate(required)]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = "PHONE_RE", message = "Phone number must be exactly 10 digits"))]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 5, max = 20))]
    pub social_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub address: Option<Address>,
    #[serde(default)]
    pub medical_history: Vec<String>,
    /// Referring doctor id.
    pub doctor_referred: Option<String>,
}

impl Schema for PatientDraft {
    /// The referring doctor is only mandatory when the patient is created.
    fn check(&self, mode: Mode) -> Result<(), FieldErrors> {
        let mut errors = check(self).err().unwrap_or_default();
        if mode == Mode::Create && self.doctor_referred.as_deref().map_or(true, str::is_empty) {
            errors.add("doctor_referred", "Referring doctor is required");
        }
        errors.into_result()
    }
}

impl From<&Patient> for PatientDraft {
    fn from(p: &Patient) -> Self {
        Self {
            name: p.name.clone(),
            date_of_birth: p
                .date_of_birth
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok()),
            gender: p.gender,
            phone_number: p.phone_number.clone(),
            social_number: p.social_number.clone(),
            address: p.address.clone(),
            medical_history: p.medical_history.clone(),
            doctor_referred: p.referring_doctor_id().map(str::to_string),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Doctor
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 2, max = 100))]
    pub specialization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50))]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = "PHONE_RE", message = "Contact number must be exactly 10 digits"))]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub address: Option<Address>,
    pub experience: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative: Option<String>,
}

impl Default for DoctorDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            specialization: String::new(),
            license_number: None,
            contact_number: None,
            address: Some(Address::with_country(DEFAULT_DOCTOR_COUNTRY)),
            experience: 0,
            is_active: true,
            representative: None,
        }
    }
}

impl DoctorDraft {
    /// Draft for inline registration from a search query.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            ..Self::default()
        }
    }
}

impl Schema for DoctorDraft {}

impl From<&Doctor> for DoctorDraft {
    fn from(d: &Doctor) -> Self {
        Self {
            name: d.name.clone(),
            specialization: d.specialization.clone(),
            license_number: d.license_number.clone(),
            contact_number: d.contact_number.clone(),
            address: d.address.clone(),
            experience: d.experience,
            is_active: d.is_active,
            representative: d.representative.as_ref().map(|r| r.id().to_string()),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Radiologist
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RadiologistDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(required)]
    pub gender: Option<Gender>,
    #[validate(range(min = 18, max = 150, message = "Age must be between 18 and 150"))]
    pub age: u32,
    #[validate(regex(path = "PHONE_RE", message = "Phone number must be exactly 10 digits"))]
    pub phone_number: String,
    #[validate(length(min = 5, max = 20))]
    pub license_id: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Default for RadiologistDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: None,
            age: 18,
            phone_number: String::new(),
            license_id: String::new(),
            is_active: true,
        }
    }
}

impl Schema for RadiologistDraft {}

impl From<&Radiologist> for RadiologistDraft {
    fn from(r: &Radiologist) -> Self {
        Self {
            name: r.name.clone(),
            gender: r.gender,
            age: r.age,
            phone_number: r.phone_number.clone(),
            license_id: r.license_id.clone(),
            is_active: r.is_active,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Branch
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BranchDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 2, max = 200))]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = "PHONE_RE", message = "Phone number must be exactly 10 digits"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub manager: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Default for BranchDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            address: None,
            phone: None,
            manager: None,
            is_active: true,
        }
    }
}

impl Schema for BranchDraft {}

impl From<&Branch> for BranchDraft {
    fn from(b: &Branch) -> Self {
        Self {
            name: b.name.clone(),
            location: b.location.clone(),
            address: b.address.clone(),
            phone: b.phone.clone(),
            manager: b.manager.clone(),
            is_active: b.is_active,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Representative
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativeDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub id_number: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Default for RepresentativeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            id_number: String::new(),
            is_active: true,
        }
    }
}

impl Schema for RepresentativeDraft {}

impl From<&Representative> for RepresentativeDraft {
    fn from(r: &Representative) -> Self {
        Self {
            name: r.name.clone(),
            id_number: r.id_number.clone(),
            is_active: r.is_active,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Scan category
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScanCategoryDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Default for ScanCategoryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            price: 0.0,
            duration: 15,
            is_active: true,
        }
    }
}

impl Schema for ScanCategoryDraft {}

impl From<&ScanCategory> for ScanCategoryDraft {
    fn from(c: &ScanCategory) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            price: c.price,
            duration: c.duration,
            is_active: c.is_active,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Stock item
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StockDraft {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    /// Branch id.
    #[validate(required)]
    pub branch: Option<String>,
    #[validate(range(min = 0.0, message = "Quantity cannot be negative"))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(range(min = 0.0, message = "Threshold cannot be negative"))]
    pub minimum_threshold: f64,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(required)]
    pub valid_until: Option<NaiveDate>,
}

impl Schema for StockDraft {
    /// Expiry must lie in the future when the item is created.
    fn check(&self, mode: Mode) -> Result<(), FieldErrors> {
        let mut errors = check(self).err().unwrap_or_default();
        if let (Mode::Create, Some(date)) = (mode, &self.valid_until) {
            if let Err(e) = future_date(date) {
                errors.add("valid_until", &e.message.unwrap_or_default());
            }
        }
        errors.into_result()
    }
}

impl From<&StockItem> for StockDraft {
    fn from(s: &StockItem) -> Self {
        Self {
            name: s.name.clone(),
            branch: s.branch.as_ref().map(|b| b.id().to_string()),
            quantity: s.quantity,
            unit: s.unit.clone(),
            minimum_threshold: s.minimum_threshold,
            price: s.price,
            valid_until: s.valid_until_date(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// User
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 3, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6))]
    pub password: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            full_name: String::new(),
            email: String::new(),
            role: Role::default(),
            password: None,
            is_active: true,
        }
    }
}

impl Schema for UserDraft {
    fn check(&self, mode: Mode) -> Result<(), FieldErrors> {
        let mut errors = check(self).err().unwrap_or_default();
        if mode == Mode::Create && self.password.is_none() {
            errors.add("password", "This field is required");
        }
        errors.into_result()
    }
}

impl From<&User> for UserDraft {
    fn from(u: &User) -> Self {
        Self {
            username: u.username.clone(),
            full_name: u.full_name.clone(),
            email: u.email.clone(),
            role: u.role,
            password: None,
            is_active: u.is_active,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Patient history, privileges
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatientHistoryDraft {
    #[validate(required)]
    pub patient: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(length(min = 2, max = 500))]
    pub diagnosis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub findings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
}

impl Schema for PatientHistoryDraft {}

impl From<&PatientHistoryEntry> for PatientHistoryDraft {
    fn from(h: &PatientHistoryEntry) -> Self {
        Self {
            patient: h.patient.as_ref().map(|p| p.id().to_string()),
            date: h
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok()),
            diagnosis: h.diagnosis.clone(),
            findings: h.findings.clone(),
            notes: h.notes.clone(),
            doctor: h.doctor.as_ref().map(|d| d.id().to_string()),
        }
    }
}

/// Body of the grant and revoke privilege calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PrivilegeGrant {
    #[validate(length(min = 1, message = "Select at least one privilege"))]
    pub privileges: Vec<Privilege>,
}

impl Schema for PrivilegeGrant {}
