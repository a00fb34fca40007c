//! `/admin/audit`: appointment audit trail with stats cards and expandable
//! change rows.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::Value;

use crate::api::AuditFilter;
use crate::http::ApiError;
use crate::models::{AuditAction, AuditEntry, AuditStats, SortOrder};
use crate::widgets::EmptyState;

use super::appointment_history::pretty_changes;
use super::ScreenContext;

/// One stats card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditCard {
    pub label: String,
    pub value: String,
}

/// One audit row. `before`/`after` are only filled while expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRow {
    pub id: String,
    pub action: AuditAction,
    pub actor: String,
    pub when: String,
    pub appointment: Option<String>,
    pub expanded: bool,
    pub before: Option<String>,
    pub after: Option<String>,
}

pub struct AuditLogScreen {
    ctx: ScreenContext,
    filter: AuditFilter,
    entries: Vec<AuditEntry>,
    total: u64,
    stats: Option<AuditStats>,
    expanded: BTreeSet<String>,
    loaded: bool,
}

impl AuditLogScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            filter: AuditFilter::default(),
            entries: Vec::new(),
            total: 0,
            stats: None,
            expanded: BTreeSet::new(),
            loaded: false,
        }
    }

    pub fn filter(&self) -> &AuditFilter {
        &self.filter
    }

    /// Logs and stats, fetched in parallel over the same date range.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let audit = &self.ctx.api.audit;
        let (logs, stats) = tokio::join!(
            audit.appointment_logs(&self.filter),
            audit.stats(self.filter.start_date, self.filter.end_date),
        );
        match stats {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => tracing::warn!(error = %e, "Audit stats failed to load"),
        }
        match logs {
            Ok(page) => {
                self.entries = page.items;
                self.total = page.total;
                self.expanded.clear();
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                let fallback = self.ctx.locale.t("audit.loadFailed");
                self.ctx.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }

    pub async fn set_action(&mut self, action: Option<AuditAction>) -> Result<(), ApiError> {
        self.filter.action = action;
        self.reload_from_first().await
    }

    pub async fn set_dates(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), ApiError> {
        self.filter.start_date = start;
        self.filter.end_date = end;
        self.reload_from_first().await
    }

    /// Sort by `key` (blank clears it).
    pub async fn set_sort(&mut self, key: &str, order: SortOrder) -> Result<(), ApiError> {
        self.filter.sort_by = Some(key.trim().to_string()).filter(|k| !k.is_empty());
        self.filter.sort_order = order;
        self.reload_from_first().await
    }

    pub async fn clear_filters(&mut self) -> Result<(), ApiError> {
        self.filter = AuditFilter {
            limit: self.filter.limit,
            ..AuditFilter::default()
        };
        self.load().await
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.filter.page = page.max(1);
        self.load().await
    }

    async fn reload_from_first(&mut self) -> Result<(), ApiError> {
        self.filter.page = 1;
        self.load().await
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn stats(&self) -> Option<&AuditStats> {
        self.stats.as_ref()
    }

    /// Total entries, most active user, most common action.
    pub fn cards(&self) -> Vec<AuditCard> {
        let locale = &self.ctx.locale;
        let stats = self.stats.clone().unwrap_or_default();
        let none = || "-".to_string();
        vec![
            AuditCard {
                label: locale.t("audit.totalEntries"),
                value: stats.total_entries.to_string(),
            },
            AuditCard {
                label: locale.t("audit.mostActiveUser"),
                value: stats
                    .most_active_user
                    .map(|u| format!("{} ({})", u.username, u.count))
                    .unwrap_or_else(none),
            },
            AuditCard {
                label: locale.t("audit.mostCommonAction"),
                value: stats
                    .most_common_action
                    .map(|a| format!("{} ({})", a.action, a.count))
                    .unwrap_or_else(none),
            },
        ]
    }

    /// Flip a row open or closed.
    pub fn toggle(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn rows(&self) -> Vec<AuditRow> {
        self.entries
            .iter()
            .map(|entry| {
                let expanded = self.expanded.contains(&entry.id);
                let (before, after) = if expanded {
                    split_changes(&entry.changes)
                } else {
                    (None, None)
                };
                AuditRow {
                    id: entry.id.clone(),
                    action: entry.action,
                    actor: entry.actor(),
                    when: entry.when(),
                    appointment: entry.appointment.as_ref().and_then(appointment_label),
                    expanded,
                    before,
                    after,
                }
            })
            .collect()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        (self.loaded && self.entries.is_empty()).then(|| EmptyState {
            icon: "history",
            title: self.ctx.locale.t("empty.title"),
            message: self.ctx.locale.t("audit.empty"),
            action: None,
        })
    }
}

/// `{before, after}` payloads split into two blocks; any other shape is
/// shown whole on the "after" side.
fn split_changes(changes: &Value) -> (Option<String>, Option<String>) {
    let side = |key: &str| {
        changes
            .get(key)
            .filter(|v| !v.is_null())
            .map(pretty_changes)
    };
    let (before, after) = (side("before"), side("after"));
    if before.is_none() && after.is_none() {
        let whole = pretty_changes(changes);
        return (None, Some(whole).filter(|s| !s.is_empty()));
    }
    (before, after)
}

/// Patient name from a populated appointment snapshot, else its id.
fn appointment_label(snapshot: &Value) -> Option<String> {
    snapshot
        .pointer("/patient/name")
        .or_else(|| snapshot.get("_id"))
        .or_else(|| snapshot.get("id"))
        .and_then(Value::as_str)
        .or_else(|| snapshot.as_str())
        .map(str::to_string)
}
