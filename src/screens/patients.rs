//! Patient index with a create/edit dialog whose referring doctor is
//! picked (or registered inline) through the doctor autocomplete.

use crate::api::{DoctorsApi, PatientsApi};
use crate::http::ApiError;
use crate::models::{Doctor, Identified, Patient};
use crate::navigation::Route;
use crate::validation::{FieldErrors, Mode, PatientDraft, Schema};
use crate::widgets::{DoctorAutocomplete, SubmitError};

use super::{entity_message, IndexScreen, ScreenContext, PATIENTS};

// ═══════════════════════════════════════════════════════════
// Editor
// ═══════════════════════════════════════════════════════════

pub struct PatientEditor {
    editing: Option<String>,
    pub draft: PatientDraft,
    doctor: DoctorAutocomplete<DoctorsApi>,
    errors: FieldErrors,
}

impl PatientEditor {
    pub fn create(doctors: DoctorsApi) -> Self {
        Self {
            editing: None,
            draft: PatientDraft::default(),
            doctor: DoctorAutocomplete::new(doctors),
            errors: FieldErrors::new(),
        }
    }

    /// Pre-filled from an existing patient; the referring doctor starts
    /// selected.
    pub fn edit(doctors: DoctorsApi, patient: &Patient) -> Self {
        let doctor = match patient.referring_doctor() {
            Some(d) => DoctorAutocomplete::with_selected(doctors, d),
            None => DoctorAutocomplete::new(doctors),
        };
        Self {
            editing: Some(patient.id().to_string()),
            draft: PatientDraft::from(patient),
            doctor,
            errors: FieldErrors::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.editing.is_some() {
            Mode::Edit
        } else {
            Mode::Create
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn doctor_search(&mut self) -> &mut DoctorAutocomplete<DoctorsApi> {
        &mut self.doctor
    }

    pub fn select_doctor(&mut self, doctor_id: &str) {
        if self.doctor.select(doctor_id).is_some() {
            self.sync_doctor();
        }
    }

    pub fn clear_doctor(&mut self) {
        self.doctor.set_selected(None);
        self.draft.doctor_referred = None;
    }

    /// Register the doctor typed into the search and make them the
    /// referring doctor.
    pub async fn register_doctor(&mut self) -> Result<Doctor, SubmitError> {
        let doctor = self.doctor.register().await?;
        self.sync_doctor();
        Ok(doctor)
    }

    fn sync_doctor(&mut self) {
        self.draft.doctor_referred = self.doctor.selected_id().map(str::to_string);
    }

    /// Validate and send. Inline errors are kept on the editor.
    pub async fn save(&mut self, api: &PatientsApi) -> Result<Patient, SubmitError> {
        self.sync_doctor();
        if let Err(errors) = self.draft.check(self.mode()) {
            self.errors = errors.clone();
            return Err(errors.into());
        }
        self.errors = FieldErrors::new();
        let saved = match &self.editing {
            Some(id) => api.update(id, &self.draft).await?,
            None => api.create(&self.draft).await?,
        };
        Ok(saved)
    }
}

// ═══════════════════════════════════════════════════════════
// Screen
// ═══════════════════════════════════════════════════════════

pub struct PatientsScreen {
    ctx: ScreenContext,
    list: IndexScreen<PatientsApi>,
    editor: Option<PatientEditor>,
}

impl PatientsScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        let list = IndexScreen::new(ctx.api.patients.clone(), PATIENTS, ctx.locale.clone(), ctx.toasts.clone());
        Self {
            ctx,
            list,
            editor: None,
        }
    }

    /// Rows, paging and the delete dialog.
    pub fn list(&self) -> &IndexScreen<PatientsApi> {
        &self.list
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.list.load().await
    }

    pub async fn set_search(&mut self, text: &str) -> Result<(), ApiError> {
        self.list.set_search(text).await
    }

    /// Set or clear (blank value) a filter field.
    pub async fn set_filter(&mut self, key: &str, value: &str) -> Result<(), ApiError> {
        self.list.set_filter(key, value).await
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.list.set_page(page).await
    }

    pub fn open_detail(&self, id: &str) {
        self.ctx.navigator.navigate(Route::PatientDetail(id.to_string()));
    }

    // ── Editor ──────────────────────────────────────────────

    pub fn open_create(&mut self) {
        self.editor = Some(PatientEditor::create(self.ctx.api.doctors.clone()));
    }

    pub fn open_edit(&mut self, id: &str) {
        let Some(patient) = self.list.rows().iter().find(|p| p.id == id) else {
            return;
        };
        self.editor = Some(PatientEditor::edit(self.ctx.api.doctors.clone(), patient));
    }

    pub fn editor(&mut self) -> Option<&mut PatientEditor> {
        self.editor.as_mut()
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Submit the editor; success closes it and refetches the page, an API
    /// failure toasts and keeps it open.
    pub async fn save_editor(&mut self) -> Result<Patient, SubmitError> {
        let Some(editor) = self.editor.as_mut() else {
            return Err(FieldErrors::single("form", "No open form").into());
        };
        let key = if editor.is_edit() { "updated" } else { "created" };
        let result = editor.save(&self.ctx.api.patients).await;
        match result {
            Ok(saved) => {
                tracing::info!(patient = %saved.id, key, "Patient saved");
                self.editor = None;
                self.ctx.toasts.success(entity_message(&self.ctx.locale, key, PATIENTS.one));
                let _ = self.list.load().await;
                Ok(saved)
            }
            Err(e) => {
                let fallback = entity_message(&self.ctx.locale, "saveFailed", PATIENTS.one);
                if let Some(message) = e.toast_message(&fallback) {
                    self.ctx.toasts.error(message);
                }
                Err(e)
            }
        }
    }

    // ── Delete ──────────────────────────────────────────────

    pub fn request_delete(&mut self, id: &str) {
        self.list.request_delete(id);
    }

    pub fn cancel_delete(&mut self) {
        self.list.cancel_delete();
    }

    pub async fn confirm_delete(&mut self) -> bool {
        self.list.confirm_delete().await
    }
}
