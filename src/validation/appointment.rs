//! Appointment composer form and the body it submits.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{check, FieldErrors, Mode, Schema};
use crate::models::{AppointmentStatus, Priority};
use crate::pricing::Line;

/// Header fields of the composer. Scan lines are held separately.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct AppointmentForm {
    #[validate(required)]
    pub patient: Option<String>,
    pub doctor: Option<String>,
    #[validate(required)]
    pub radiologist: Option<String>,
    #[validate(required)]
    pub branch: Option<String>,
    #[validate(required)]
    pub day: Option<NaiveDate>,
    #[validate(required)]
    pub time: Option<NaiveTime>,
    pub priority: Priority,
    pub status: AppointmentStatus,
    pub notes: String,
    pub make_huge_sale: bool,
    pub custom_price: Option<f64>,
}

impl Schema for AppointmentForm {
    /// The doctor may be derived from the patient on creation but is
    /// mandatory when editing; a huge sale needs a positive override.
    fn check(&self, mode: Mode) -> Result<(), FieldErrors> {
        let mut errors = check(self).err().unwrap_or_default();
        if mode == Mode::Edit && self.doctor.as_deref().map_or(true, str::is_empty) {
            errors.add("doctor", "This field is required");
        }
        if self.make_huge_sale && !self.custom_price.is_some_and(|p| p > 0.0) {
            errors.add("custom_price", "Custom price must be greater than 0");
        }
        errors.into_result()
    }
}

impl AppointmentForm {
    /// Midnight of `day` plus the hours and minutes of `time`, in UTC with
    /// millisecond precision (`2025-05-10T10:30:00.000Z`).
    pub fn scheduled_at(&self) -> Option<String> {
        let day = self.day?;
        let time = self.time?;
        let at = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)?;
        Some(
            day.and_time(at)
                .and_utc()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
        )
    }

    /// Validate the form and its lines, then build the request body.
    ///
    /// `may_huge_sale` is whether the current user holds the override
    /// privilege; a flag set without it is rejected.
    pub fn to_payload(
        &self,
        mode: Mode,
        lines: &[Line],
        price: f64,
        may_huge_sale: bool,
    ) -> Result<AppointmentPayload, FieldErrors> {
        let mut errors = self.check(mode).err().unwrap_or_default();
        if self.make_huge_sale && !may_huge_sale {
            errors.add("make_huge_sale", "Not permitted to apply a huge sale");
        }
        if lines.iter().any(|l| l.selected.is_none()) || lines.is_empty() {
            errors.add("scans", "Select a scan for every line");
        }
        if lines.iter().any(|l| l.quantity == 0) {
            errors.add("scans", "Quantity must be at least 1");
        }
        errors.clone().into_result()?;

        let (Some(patient), Some(radiologist), Some(branch), Some(scheduled_at)) = (
            self.patient.clone(),
            self.radiologist.clone(),
            self.branch.clone(),
            self.scheduled_at(),
        ) else {
            return Err(errors);
        };

        Ok(AppointmentPayload {
            patient,
            doctor: self.doctor.clone().filter(|d| !d.is_empty()),
            radiologist,
            branch,
            scheduled_at,
            priority: self.priority,
            status: self.status,
            scans: lines
                .iter()
                .filter_map(|l| {
                    Some(ScanLinePayload {
                        scan: l.selected.clone()?,
                        quantity: l.quantity,
                    })
                })
                .collect(),
            price,
            make_huge_sale: self.make_huge_sale,
            custom_price: if self.make_huge_sale {
                self.custom_price
            } else {
                None
            },
            notes: self.notes.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanLinePayload {
    pub scan: String,
    pub quantity: u32,
}

/// Body of the appointment create and patch calls. `customPrice` is sent
/// as `null` when no override applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub patient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    pub radiologist: String,
    pub branch: String,
    pub scheduled_at: String,
    pub priority: Priority,
    pub status: AppointmentStatus,
    pub scans: Vec<ScanLinePayload>,
    pub price: f64,
    pub make_huge_sale: bool,
    pub custom_price: Option<f64>,
    pub notes: String,
}
