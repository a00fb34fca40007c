//! Create/edit dialog for an appointment.
//!
//! Holds the header form, the scan lines and the catalogs the dropdowns
//! draw from. The price shown is always derived from the lines and the
//! loaded scan catalog; the override price only exists while the huge-sale
//! flag is on.

use chrono::{NaiveDate, NaiveTime};

use crate::api::DoctorsApi;
use crate::i18n::format_money;
use crate::models::{Appointment, Branch, Identified, Patient, Radiologist, Ref, Scan};
use crate::pricing::{appointment_price, Line};
use crate::validation::{AppointmentForm, FieldErrors, Mode};
use crate::widgets::{DoctorAutocomplete, SubmitError};

use super::ScreenContext;

pub struct AppointmentComposer {
    ctx: ScreenContext,
    editing: Option<String>,
    form: AppointmentForm,
    lines: Vec<Line>,
    patients: Vec<Patient>,
    radiologists: Vec<Radiologist>,
    branches: Vec<Branch>,
    scans: Vec<Scan>,
    doctor: DoctorAutocomplete<DoctorsApi>,
    errors: FieldErrors,
    may_huge_sale: bool,
}

impl AppointmentComposer {
    /// Load the catalogs in parallel and open empty or pre-filled.
    pub async fn open(ctx: ScreenContext, existing: Option<&Appointment>) -> Self {
        let api = &ctx.api;
        let (patients, radiologists, branches, scans) = tokio::join!(
            api.patients.all(),
            api.radiologists.all(),
            api.branches.all(),
            api.scans.all(),
        );
        let fallback = ctx.locale.t("appointments.catalogFailed");
        let take = |name: &str, e: crate::http::ApiError| {
            tracing::warn!(catalog = name, error = %e, "Composer catalog failed to load");
            ctx.toasts.error(e.user_message(&fallback));
        };
        let patients = patients.unwrap_or_else(|e| {
            take("patients", e);
            Vec::new()
        });
        let radiologists = radiologists.unwrap_or_else(|e| {
            take("radiologists", e);
            Vec::new()
        });
        let branches = branches.unwrap_or_else(|e| {
            take("branches", e);
            Vec::new()
        });
        let scans = scans.unwrap_or_else(|e| {
            take("scans", e);
            Vec::new()
        });

        let doctors = ctx.api.doctors.clone();
        let may_huge_sale = ctx.session.may_huge_sale();
        let mut composer = Self {
            editing: None,
            form: AppointmentForm::default(),
            lines: vec![Line::default()],
            patients,
            radiologists,
            branches,
            scans,
            doctor: DoctorAutocomplete::new(doctors),
            errors: FieldErrors::new(),
            may_huge_sale,
            ctx,
        };
        if let Some(appointment) = existing {
            composer.prefill(appointment);
        }
        composer
    }

    fn prefill(&mut self, a: &Appointment) {
        self.editing = Some(a.id.clone());
        self.form = AppointmentForm {
            patient: a.patient.as_ref().map(|r| r.id().to_string()),
            doctor: a.doctor.as_ref().map(|r| r.id().to_string()),
            radiologist: a.radiologist.as_ref().map(|r| r.id().to_string()),
            branch: a.branch.as_ref().map(|r| r.id().to_string()),
            day: a.scheduled_at.map(|ts| ts.date_naive()),
            time: a.scheduled_at.map(|ts| ts.time()),
            priority: a.priority,
            status: a.status,
            notes: a.notes.clone().unwrap_or_default(),
            make_huge_sale: a.make_huge_sale,
            custom_price: a.custom_price.filter(|_| a.make_huge_sale),
        };
        if let Some(Ref::Populated(doctor)) = &a.doctor {
            self.doctor = DoctorAutocomplete::with_selected(self.ctx.api.doctors.clone(), doctor.clone());
        }
        let lines: Vec<Line> = a
            .scans
            .iter()
            .map(|l| Line::select(l.scan.id(), l.quantity))
            .collect();
        if !lines.is_empty() {
            self.lines = lines;
        }
    }

    pub fn mode(&self) -> Mode {
        if self.editing.is_some() {
            Mode::Edit
        } else {
            Mode::Create
        }
    }

    pub fn form(&self) -> &AppointmentForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    // ── Catalogs ────────────────────────────────────────────

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn radiologists(&self) -> &[Radiologist] {
        &self.radiologists
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    // ── Header fields ───────────────────────────────────────

    /// Select a patient; their referring doctor, if any, fills the doctor
    /// field. The user may still pick another doctor afterwards.
    pub fn select_patient(&mut self, patient_id: &str) {
        self.form.patient = Some(patient_id.to_string());
        let Some(patient) = self.patients.iter().find(|p| p.id == patient_id) else {
            return;
        };
        if let Some(doctor) = patient.referring_doctor() {
            self.form.doctor = Some(doctor.id.clone());
            self.doctor.set_selected(Some(doctor));
        }
    }

    pub fn doctor_search(&mut self) -> &mut DoctorAutocomplete<DoctorsApi> {
        &mut self.doctor
    }

    /// Pick a doctor from the autocomplete options.
    pub fn select_doctor(&mut self, doctor_id: &str) {
        if self.doctor.select(doctor_id).is_some() {
            self.form.doctor = Some(doctor_id.to_string());
        }
    }

    /// Take whatever the autocomplete currently has selected (after an
    /// inline registration).
    pub fn sync_doctor(&mut self) {
        if let Some(id) = self.doctor.selected_id() {
            self.form.doctor = Some(id.to_string());
        }
    }

    pub fn set_radiologist(&mut self, id: &str) {
        self.form.radiologist = Some(id.to_string()).filter(|s| !s.is_empty());
    }

    pub fn set_branch(&mut self, id: &str) {
        self.form.branch = Some(id.to_string()).filter(|s| !s.is_empty());
    }

    pub fn set_day(&mut self, day: Option<NaiveDate>) {
        self.form.day = day;
    }

    pub fn set_time(&mut self, time: Option<NaiveTime>) {
        self.form.time = time;
    }

    pub fn set_priority(&mut self, priority: crate::models::Priority) {
        self.form.priority = priority;
    }

    pub fn set_status(&mut self, status: crate::models::AppointmentStatus) {
        self.form.status = status;
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.form.notes = notes.to_string();
    }

    // ── Lines ───────────────────────────────────────────────

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn add_line(&mut self) {
        self.lines.push(Line::default());
    }

    pub fn can_remove_line(&self) -> bool {
        self.lines.len() >= 2
    }

    pub fn remove_line(&mut self, index: usize) -> bool {
        if !self.can_remove_line() || index >= self.lines.len() {
            return false;
        }
        self.lines.remove(index);
        true
    }

    pub fn set_line_scan(&mut self, index: usize, scan_id: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            line.selected = Some(scan_id.to_string()).filter(|s| !s.is_empty());
        }
    }

    pub fn set_line_quantity(&mut self, index: usize, quantity: u32) {
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
    }

    // ── Price ───────────────────────────────────────────────

    /// Σ(scan.minPrice × quantity) over the selected lines.
    pub fn calculated_price(&self) -> f64 {
        appointment_price(&self.lines, &self.scans)
    }

    pub fn price_label(&self) -> String {
        format_money(self.calculated_price())
    }

    /// Whether the huge-sale toggle is rendered.
    pub fn shows_huge_sale(&self) -> bool {
        self.may_huge_sale
    }

    /// Switching off drops the override price.
    pub fn set_huge_sale(&mut self, on: bool) {
        self.form.make_huge_sale = on;
        if !on {
            self.form.custom_price = None;
        }
    }

    pub fn set_custom_price(&mut self, price: Option<f64>) {
        self.form.custom_price = price;
    }

    // ── Submit ──────────────────────────────────────────────

    /// Validate and send. On failure the composer stays as it is.
    pub async fn submit(&mut self) -> Result<Appointment, SubmitError> {
        let mode = self.mode();
        let payload = match self.form.to_payload(
            mode,
            &self.lines,
            self.calculated_price(),
            self.may_huge_sale,
        ) {
            Ok(payload) => payload,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(errors.into());
            }
        };
        self.errors = FieldErrors::new();

        let api = &self.ctx.api.appointments;
        let result = match &self.editing {
            Some(id) => api.update(id, &payload).await,
            None => api.create(&payload).await,
        };
        result.map_err(|e| {
            let fallback = super::entity_message(&self.ctx.locale, "saveFailed", super::APPOINTMENTS.one);
            self.ctx.toasts.error(e.user_message(&fallback));
            e.into()
        })
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn scan_name(&self, id: &str) -> Option<&str> {
        self.scans.iter().find(|s| s.id() == id).map(|s| s.name.as_str())
    }
}
