//! Referring-doctor search with inline registration.
//!
//! Each keystroke bumps a generation counter and schedules a search after
//! the debounce delay. A scheduled search whose generation is no longer
//! current never fires, and a response that comes back for an older
//! generation is dropped on arrival.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::SubmitError;
use crate::api::DoctorLookup;
use crate::config::SEARCH_DEBOUNCE;
use crate::http::ApiError;
use crate::models::{Doctor, Identified};
use crate::validation::{DoctorDraft, Mode, Schema};

struct SearchReply {
    generation: u64,
    result: Result<Vec<Doctor>, ApiError>,
}

pub struct DoctorAutocomplete<L> {
    lookup: L,
    query: String,
    generation: Arc<AtomicU64>,
    /// Generation whose reply is still outstanding.
    pending: Option<u64>,
    replies_tx: mpsc::UnboundedSender<SearchReply>,
    replies_rx: mpsc::UnboundedReceiver<SearchReply>,
    options: Vec<Doctor>,
    searched: bool,
    selected: Option<Doctor>,
    error: Option<String>,
    registration: Option<DoctorDraft>,
}

impl<L: DoctorLookup + Clone> DoctorAutocomplete<L> {
    pub fn new(lookup: L) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            query: String::new(),
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            replies_tx,
            replies_rx,
            options: Vec::new(),
            searched: false,
            selected: None,
            error: None,
            registration: None,
        }
    }

    /// Start with an already chosen doctor (edit forms, patient prefill).
    pub fn with_selected(lookup: L, doctor: Doctor) -> Self {
        let mut widget = Self::new(lookup);
        widget.options.push(doctor.clone());
        widget.selected = Some(doctor);
        widget
    }

    /// New input text. Supersedes any scheduled or in-flight search.
    pub fn input(&mut self, text: &str) {
        self.query = text.to_string();
        self.searched = false;
        self.error = None;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let query = text.trim().to_string();
        if query.is_empty() {
            self.pending = None;
            self.options.clear();
            return;
        }

        self.pending = Some(generation);
        let current = self.generation.clone();
        let lookup = self.lookup.clone();
        let tx = self.replies_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            tracing::debug!(%query, "Doctor search");
            let result = lookup.search(&query).await;
            let _ = tx.send(SearchReply { generation, result });
        });
    }

    fn apply(&mut self, reply: SearchReply) {
        if Some(reply.generation) != self.pending {
            tracing::debug!(generation = reply.generation, "Stale doctor search discarded");
            return;
        }
        self.pending = None;
        self.searched = true;
        match reply.result {
            Ok(doctors) => self.options = doctors,
            Err(e) => {
                tracing::warn!(error = %e, "Doctor search failed");
                self.options.clear();
                self.error = Some(e.user_message("Failed to search doctors"));
            }
        }
    }

    /// Apply replies that have already arrived without waiting.
    pub fn poll(&mut self) {
        while let Ok(reply) = self.replies_rx.try_recv() {
            self.apply(reply);
        }
    }

    /// Wait until the search for the current input has answered.
    pub async fn settle(&mut self) {
        while self.pending.is_some() {
            match self.replies_rx.recv().await {
                Some(reply) => self.apply(reply),
                None => break,
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn options(&self) -> &[Doctor] {
        &self.options
    }

    /// Rendered option labels, `Dr. <name> — <specialization>`.
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(Doctor::option_label).collect()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether to show the "register new" action.
    pub fn offers_registration(&self) -> bool {
        self.searched && self.options.is_empty() && !self.query.trim().is_empty()
    }

    pub fn select(&mut self, doctor_id: &str) -> Option<&Doctor> {
        let doctor = self.options.iter().find(|d| d.id() == doctor_id)?.clone();
        self.selected = Some(doctor);
        self.selected.as_ref()
    }

    pub fn set_selected(&mut self, doctor: Option<Doctor>) {
        self.selected = doctor;
    }

    pub fn selected(&self) -> Option<&Doctor> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|d| d.id())
    }

    // ── Inline registration ─────────────────────────────────

    /// Open the registration dialog pre-filled with the query.
    pub fn open_registration(&mut self) -> &mut DoctorDraft {
        self.registration.insert(DoctorDraft::named(&self.query))
    }

    pub fn registration(&mut self) -> Option<&mut DoctorDraft> {
        self.registration.as_mut()
    }

    pub fn cancel_registration(&mut self) {
        self.registration = None;
    }

    /// Create the doctor, add it to the options and select it.
    pub async fn register(&mut self) -> Result<Doctor, SubmitError> {
        let Some(draft) = self.registration.as_ref() else {
            return Err(SubmitError::Invalid(crate::validation::FieldErrors::single(
                "name",
                "Nothing to register",
            )));
        };
        draft.check(Mode::Create)?;
        let doctor = self.lookup.register(draft).await?;
        tracing::info!(doctor = %doctor.id, "Doctor registered inline");

        self.registration = None;
        self.options.retain(|d| d.id() != doctor.id());
        self.options.insert(0, doctor.clone());
        self.selected = Some(doctor.clone());
        Ok(doctor)
    }
}
