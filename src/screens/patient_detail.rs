//! `/patients/:id`: the patient record with its clinical history and
//! appointments.

use crate::http::ApiError;
use crate::models::{Appointment, Patient, PatientHistoryEntry};
use crate::navigation::Route;
use crate::widgets::EmptyState;

use super::{entity_message, ScreenContext, PATIENTS};

pub struct PatientDetailScreen {
    ctx: ScreenContext,
    patient_id: String,
    patient: Option<Patient>,
    history: Vec<PatientHistoryEntry>,
    appointments: Vec<Appointment>,
    loaded: bool,
}

impl PatientDetailScreen {
    pub fn new(ctx: ScreenContext, patient_id: &str) -> Self {
        Self {
            ctx,
            patient_id: patient_id.to_string(),
            patient: None,
            history: Vec::new(),
            appointments: Vec::new(),
            loaded: false,
        }
    }

    /// Fetch the record, its history and its appointments in parallel.
    /// A missing patient is not an error; the side lists degrade to empty.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let api = &self.ctx.api;
        let id = self.patient_id.as_str();
        let (patient, history, appointments) = tokio::join!(
            api.patients.get(id),
            api.patient_history.list_by_patient(id),
            api.appointments.by_patient(id),
        );
        self.loaded = true;

        self.history = history.unwrap_or_else(|e| {
            tracing::warn!(patient = id, error = %e, "Patient history failed to load");
            Vec::new()
        });
        self.appointments = appointments.unwrap_or_else(|e| {
            tracing::warn!(patient = id, error = %e, "Patient appointments failed to load");
            Vec::new()
        });

        match patient {
            Ok(patient) => {
                self.patient = Some(patient);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.patient = None;
                Ok(())
            }
            Err(e) => {
                self.patient = None;
                let fallback = entity_message(&self.ctx.locale, "loadFailed", PATIENTS.one);
                self.ctx.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.patient.as_ref()
    }

    pub fn history(&self) -> &[PatientHistoryEntry] {
        &self.history
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        (self.loaded && self.patient.is_none()).then(|| EmptyState::not_found(&self.ctx.locale))
    }

    pub fn open_appointment_history(&self, appointment_id: &str) {
        self.ctx
            .navigator
            .navigate(Route::AppointmentHistory(appointment_id.to_string()));
    }
}
