use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::branch::Branch;
use super::common::{Identified, Ref};
use super::doctor::Doctor;
use super::enums::{AppointmentStatus, Priority};
use super::patient::Patient;
use super::radiologist::Radiologist;
use super::scan::Scan;

/// One scan line of an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanLine {
    pub scan: Ref<Scan>,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Appointment {
    #[serde(alias = "_id")]
    pub id: String,
    pub patient: Option<Ref<Patient>>,
    #[serde(alias = "referredBy")]
    pub doctor: Option<Ref<Doctor>>,
    pub radiologist: Option<Ref<Radiologist>>,
    pub branch: Option<Ref<Branch>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: AppointmentStatus,
    pub scans: Vec<ScanLine>,
    pub price: f64,
    pub make_huge_sale: bool,
    pub custom_price: Option<f64>,
    pub notes: Option<String>,
    pub report_url: Option<String>,
    pub created_at: Option<String>,
}

impl Appointment {
    /// Price the clinic charges: the override when the huge-sale flag is
    /// set, the computed price otherwise.
    pub fn effective_price(&self) -> f64 {
        match (self.make_huge_sale, self.custom_price) {
            (true, Some(custom)) => custom,
            _ => self.price,
        }
    }

    pub fn patient_name(&self) -> String {
        ref_label(&self.patient, |p| p.name.clone())
    }

    pub fn doctor_name(&self) -> String {
        ref_label(&self.doctor, |d| d.name.clone())
    }

    pub fn radiologist_name(&self) -> String {
        ref_label(&self.radiologist, |r| r.name.clone())
    }

    pub fn branch_name(&self) -> String {
        ref_label(&self.branch, |b| b.name.clone())
    }

    /// `"MRI Brain ×2, CT Chest ×1"`. Unpopulated lines show their id.
    pub fn scan_summary(&self) -> String {
        self.scans
            .iter()
            .map(|line| {
                let name = line
                    .scan
                    .populated()
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| line.scan.id().to_string());
                format!("{name} ×{}", line.quantity)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn ref_label<T: Identified>(r: &Option<Ref<T>>, name: impl Fn(&T) -> String) -> String {
    match r {
        Some(Ref::Populated(item)) => name(item),
        Some(Ref::Id(id)) => id.clone(),
        None => String::new(),
    }
}

impl Identified for Appointment {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Appointment {
        serde_json::from_str(
            r#"{"_id":"a1",
                "patient":{"_id":"p1","name":"Sara"},
                "doctor":"d1",
                "scheduledAt":"2025-05-10T10:30:00.000Z",
                "priority":"urgent","status":"in-progress",
                "scans":[{"scan":{"_id":"s1","name":"MRI"},"quantity":2},{"scan":"s2","quantity":1}],
                "price":350,"makeHugeSale":false,"customPrice":null}"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_wire_shape() {
        let a = sample();
        assert_eq!(a.priority, Priority::Urgent);
        assert_eq!(a.status, AppointmentStatus::InProgress);
        assert_eq!(a.patient_name(), "Sara");
        assert_eq!(a.doctor_name(), "d1");
        assert_eq!(a.radiologist_name(), "");
        assert!(a.scheduled_at.is_some());
    }

    #[test]
    fn effective_price_prefers_override_only_with_flag() {
        let mut a = sample();
        assert_eq!(a.effective_price(), 350.0);
        a.custom_price = Some(200.0);
        assert_eq!(a.effective_price(), 350.0);
        a.make_huge_sale = true;
        assert_eq!(a.effective_price(), 200.0);
    }

    #[test]
    fn scan_summary_lists_lines() {
        assert_eq!(sample().scan_summary(), "MRI ×2, s2 ×1");
    }
}
