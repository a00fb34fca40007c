//! Change history of one appointment (`/appointments/:id/history`).

use crate::http::ApiError;
use crate::models::{AuditAction, AuditEntry};
use crate::widgets::EmptyState;

use super::ScreenContext;

/// One rendered history line.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub action: AuditAction,
    pub actor: String,
    pub when: String,
    /// Pretty-printed `changes`, empty when the entry carries none.
    pub changes: String,
}

pub struct AppointmentHistoryScreen {
    ctx: ScreenContext,
    appointment_id: String,
    entries: Vec<AuditEntry>,
    loaded: bool,
    missing: bool,
}

impl AppointmentHistoryScreen {
    pub fn new(ctx: ScreenContext, appointment_id: &str) -> Self {
        Self {
            ctx,
            appointment_id: appointment_id.to_string(),
            entries: Vec::new(),
            loaded: false,
            missing: false,
        }
    }

    pub fn appointment_id(&self) -> &str {
        &self.appointment_id
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.ctx.api.appointments.history(&self.appointment_id).await {
            Ok(entries) => {
                self.entries = entries;
                self.loaded = true;
                self.missing = false;
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.entries.clear();
                self.loaded = true;
                self.missing = true;
                Ok(())
            }
            Err(e) => {
                let fallback = self.ctx.locale.t("history.loadFailed");
                self.ctx.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn rows(&self) -> Vec<HistoryRow> {
        self.entries
            .iter()
            .map(|entry| HistoryRow {
                action: entry.action,
                actor: entry.actor(),
                when: entry.when(),
                changes: pretty_changes(&entry.changes),
            })
            .collect()
    }

    pub fn back(&self) {
        self.ctx.navigator.back();
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.missing {
            return Some(EmptyState::not_found(&self.ctx.locale));
        }
        (self.loaded && self.entries.is_empty()).then(|| EmptyState {
            icon: "history",
            title: self.ctx.locale.t("empty.title"),
            message: self.ctx.locale.t("history.empty"),
            action: None,
        })
    }
}

/// Indented JSON for a `changes` payload; null renders as nothing.
pub(crate) fn pretty_changes(changes: &serde_json::Value) -> String {
    if changes.is_null() {
        return String::new();
    }
    serde_json::to_string_pretty(changes).unwrap_or_else(|_| changes.to_string())
}
