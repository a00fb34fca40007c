//! Appointments index: stats tiles, filters, table/calendar tabs, row
//! actions, the composer dialog and status updates.

use chrono::NaiveDate;

use crate::api::StatusReport;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::http::{ApiError, Query};
use crate::i18n::{format_money, format_timestamp};
use crate::models::{Appointment, AppointmentStatus, Priority, Representative};
use crate::navigation::Route;
use crate::widgets::{ConfirmDialog, EmptyState, SubmitError};

use super::{entity_message, AppointmentComposer, ScreenContext, APPOINTMENTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentsTab {
    #[default]
    Table,
    Calendar,
}

/// List filters. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilters {
    pub search: String,
    pub status: Option<AppointmentStatus>,
    pub patient: Option<String>,
    pub doctor: Option<String>,
    pub representative: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AppointmentFilters {
    pub fn to_query(&self) -> Query {
        Query::new()
            .set("search", self.search.trim())
            .opt("status", self.status)
            .opt("patient", self.patient.as_deref())
            .opt("doctor", self.doctor.as_deref())
            .opt("representative", self.representative.as_deref())
            .opt("startDate", self.from.map(|d| d.format("%Y-%m-%d")))
            .opt("endDate", self.to.map(|d| d.format("%Y-%m-%d")))
    }
}

/// Tiles counted over the loaded page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentStatsTiles {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub cancelled: usize,
}

impl AppointmentStatsTiles {
    pub fn from_rows(rows: &[Appointment]) -> Self {
        let count = |status| rows.iter().filter(|a| a.status == status).count();
        Self {
            total: rows.len(),
            completed: count(AppointmentStatus::Completed),
            pending: count(AppointmentStatus::Pending),
            cancelled: count(AppointmentStatus::Cancelled),
        }
    }
}

/// One table row, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRow {
    pub id: String,
    pub patient: String,
    pub doctor: String,
    pub radiologist: String,
    pub branch: String,
    pub scheduled: String,
    pub status: AppointmentStatus,
    pub priority: Priority,
    pub price: String,
    /// "Huge Sale" badge next to the price.
    pub badge: Option<String>,
    pub scans: String,
}

/// Pending status change, with an optional PDF report.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub id: String,
    pub status: AppointmentStatus,
    pub notes: String,
    pub report: Option<StatusReport>,
}

pub struct AppointmentsScreen {
    ctx: ScreenContext,
    filters: AppointmentFilters,
    page: u32,
    limit: u32,
    rows: Vec<Appointment>,
    total: u64,
    loaded: bool,
    tab: AppointmentsTab,
    representatives: Vec<Representative>,
    confirm: ConfirmDialog<String>,
    composer: Option<AppointmentComposer>,
    status_update: Option<StatusUpdate>,
}

impl AppointmentsScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            filters: AppointmentFilters::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            rows: Vec::new(),
            total: 0,
            loaded: false,
            tab: AppointmentsTab::default(),
            representatives: Vec::new(),
            confirm: ConfirmDialog::new(),
            composer: None,
            status_update: None,
        }
    }

    pub fn query(&self) -> Query {
        self.filters.to_query().page(self.page, self.limit)
    }

    /// First load: the page plus the representative filter options.
    pub async fn mount(&mut self) {
        let reps = self.ctx.api.representatives.clone();
        let (_, options) = tokio::join!(self.load(), reps.active_dropdown());
        match options {
            Ok(reps) => self.representatives = reps,
            Err(e) => tracing::warn!(error = %e, "Representative options failed to load"),
        }
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.ctx.api.appointments.list(&self.query()).await {
            Ok(page) => {
                self.rows = page.items;
                self.total = page.total;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                let fallback = entity_message(&self.ctx.locale, "loadFailed", APPOINTMENTS.many);
                self.ctx.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.load().await
    }

    /// Replace the filters; back to page 1.
    pub async fn set_filters(&mut self, filters: AppointmentFilters) -> Result<(), ApiError> {
        self.filters = filters;
        self.page = 1;
        self.load().await
    }

    pub fn filters(&self) -> &AppointmentFilters {
        &self.filters
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.page = page.max(1);
        self.load().await
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn representatives(&self) -> &[Representative] {
        &self.representatives
    }

    pub fn tab(&self) -> AppointmentsTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: AppointmentsTab) {
        self.tab = tab;
    }

    pub fn stats(&self) -> AppointmentStatsTiles {
        AppointmentStatsTiles::from_rows(&self.rows)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.rows
    }

    pub fn rows(&self) -> Vec<AppointmentRow> {
        let badge = self.ctx.locale.t("appointments.hugeSale");
        self.rows
            .iter()
            .map(|a| AppointmentRow {
                id: a.id.clone(),
                patient: a.patient_name(),
                doctor: a.doctor_name(),
                radiologist: a.radiologist_name(),
                branch: a.branch_name(),
                scheduled: a.scheduled_at.as_ref().map(format_timestamp).unwrap_or_default(),
                status: a.status,
                priority: a.priority,
                price: format_money(a.effective_price()),
                badge: a.make_huge_sale.then(|| badge.clone()),
                scans: a.scan_summary(),
            })
            .collect()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        (self.loaded && self.rows.is_empty()).then(|| {
            let name = self.ctx.locale.t(APPOINTMENTS.many);
            EmptyState::no_results(&self.ctx.locale, &name)
        })
    }

    pub fn open_history(&self, id: &str) {
        self.ctx.navigator.navigate(Route::AppointmentHistory(id.to_string()));
    }

    // ── Composer ────────────────────────────────────────────

    pub async fn open_create(&mut self) {
        self.composer = Some(AppointmentComposer::open(self.ctx.clone(), None).await);
    }

    pub async fn open_edit(&mut self, id: &str) {
        let Some(existing) = self.rows.iter().find(|a| a.id == id).cloned() else {
            return;
        };
        self.composer = Some(AppointmentComposer::open(self.ctx.clone(), Some(&existing)).await);
    }

    pub fn composer(&mut self) -> Option<&mut AppointmentComposer> {
        self.composer.as_mut()
    }

    pub fn close_composer(&mut self) {
        self.composer = None;
    }

    /// Submit the composer; success closes it and refetches.
    pub async fn save_composer(&mut self) -> Result<Appointment, SubmitError> {
        let Some(composer) = self.composer.as_mut() else {
            return Err(crate::validation::FieldErrors::single("form", "No open form").into());
        };
        let key = if composer.is_edit() { "updated" } else { "created" };
        let saved = composer.submit().await?;
        self.composer = None;
        self.ctx
            .toasts
            .success(entity_message(&self.ctx.locale, key, APPOINTMENTS.one));
        let _ = self.load().await;
        Ok(saved)
    }

    // ── Delete ──────────────────────────────────────────────

    pub fn request_delete(&mut self, id: &str) {
        let message = entity_message(&self.ctx.locale, "confirmDelete", APPOINTMENTS.one);
        self.confirm.open(id.to_string(), message);
    }

    pub fn confirm_dialog(&self) -> &ConfirmDialog<String> {
        &self.confirm
    }

    pub fn cancel_delete(&mut self) {
        self.confirm.cancel();
    }

    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.confirm.confirm() else {
            return false;
        };
        match self.ctx.api.appointments.delete(&id).await {
            Ok(()) => {
                self.ctx
                    .toasts
                    .success(entity_message(&self.ctx.locale, "deleted", APPOINTMENTS.one));
                let _ = self.load().await;
                true
            }
            Err(e) => {
                let fallback = entity_message(&self.ctx.locale, "deleteFailed", APPOINTMENTS.one);
                self.ctx.toasts.error(e.user_message(&fallback));
                false
            }
        }
    }

    // ── Status ──────────────────────────────────────────────

    pub fn open_status_update(&mut self, id: &str) {
        let status = self
            .rows
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.status)
            .unwrap_or_default();
        self.status_update = Some(StatusUpdate {
            id: id.to_string(),
            status,
            notes: String::new(),
            report: None,
        });
    }

    pub fn status_update(&mut self) -> Option<&mut StatusUpdate> {
        self.status_update.as_mut()
    }

    pub async fn submit_status_update(&mut self) -> Result<Appointment, ApiError> {
        let Some(update) = self.status_update.clone() else {
            return Err(ApiError::Decode("no status update open".into()));
        };
        let result = self
            .ctx
            .api
            .appointments
            .update_status(&update.id, update.status, Some(update.notes.as_str()), update.report)
            .await;
        match result {
            Ok(saved) => {
                self.status_update = None;
                self.ctx.toasts.success(self.ctx.locale.t("appointments.statusUpdated"));
                let _ = self.load().await;
                Ok(saved)
            }
            Err(e) => {
                let fallback = entity_message(&self.ctx.locale, "saveFailed", APPOINTMENTS.one);
                self.ctx.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::screens::fixtures::context;
    use crate::testing::TestEnv;

    fn page_body() -> serde_json::Value {
        json!({"data": {"appointments": [
            {"_id": "a1", "patient": {"_id": "p1", "name": "Sara"}, "doctor": {"_id": "d1", "name": "Smith"},
             "scheduledAt": "2025-05-10T10:30:00.000Z", "status": "completed", "priority": "urgent",
             "scans": [{"scan": {"_id": "s1", "name": "MRI"}, "quantity": 2}],
             "price": 350, "makeHugeSale": true, "customPrice": 200},
            {"_id": "a2", "patient": "p2", "status": "pending", "price": 150},
            {"_id": "a3", "patient": "p3", "status": "cancelled", "price": 90}
        ], "pagination": {"total": 23}}})
    }

    #[tokio::test]
    async fn stats_count_loaded_page() {
        let env = TestEnv::signed_in().await;
        env.backend.on("GET", "/appointments", 200, page_body());
        let mut screen = AppointmentsScreen::new(context(&env));

        screen.load().await.unwrap();

        assert_eq!(
            screen.stats(),
            AppointmentStatsTiles {
                total: 3,
                completed: 1,
                pending: 1,
                cancelled: 1
            }
        );
        assert_eq!(screen.total(), 23);
    }

    #[tokio::test]
    async fn huge_sale_row_shows_badge_and_override() {
        let env = TestEnv::signed_in().await;
        env.backend.on("GET", "/appointments", 200, page_body());
        let mut screen = AppointmentsScreen::new(context(&env));
        screen.load().await.unwrap();

        let rows = screen.rows();
        assert_eq!(rows[0].price, "$200.00");
        assert_eq!(rows[0].badge.as_deref(), Some("Huge Sale"));
        assert_eq!(rows[0].scheduled, "2025-05-10 10:30");
        assert_eq!(rows[0].scans, "MRI ×2");
        assert_eq!(rows[0].doctor, "Smith");
        assert_eq!(rows[1].badge, None);
        assert_eq!(rows[1].price, "$150.00");
    }

    #[tokio::test]
    async fn filters_reset_page_and_omit_blanks() {
        let env = TestEnv::signed_in().await;
        env.backend.on("GET", "/appointments", 200, page_body());
        let mut screen = AppointmentsScreen::new(context(&env));
        screen.set_page(4).await.unwrap();

        screen
            .set_filters(AppointmentFilters {
                search: "  ".into(),
                status: Some(AppointmentStatus::NoShow),
                from: NaiveDate::from_ymd_opt(2025, 5, 1),
                representative: Some("".into()),
                ..AppointmentFilters::default()
            })
            .await
            .unwrap();

        let sent = env.backend.last("GET", "/appointments");
        assert_eq!(sent.query_value("page"), Some("1"));
        assert_eq!(sent.query_value("status"), Some("no-show"));
        assert_eq!(sent.query_value("startDate"), Some("2025-05-01"));
        let keys = sent.query_keys();
        assert!(!keys.contains(&"search"));
        assert!(!keys.contains(&"representative"));
        assert!(!keys.contains(&"endDate"));
    }

    #[tokio::test]
    async fn confirmed_delete_refetches() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/appointments", 200, page_body())
            .on("DELETE", "/appointments/a2", 200, json!({}));
        let mut screen = AppointmentsScreen::new(context(&env));
        screen.load().await.unwrap();

        screen.request_delete("a2");
        assert_eq!(env.backend.count("DELETE", "/appointments/a2"), 0);
        assert!(screen.confirm_delete().await);

        assert_eq!(env.backend.count("GET", "/appointments"), 2);
        assert_eq!(
            env.toasts.last().unwrap().message,
            "Appointment deleted successfully"
        );
    }

    #[tokio::test]
    async fn status_update_sends_pdf() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/appointments", 200, page_body())
            .on("PATCH", "/appointments/a2/status", 200, json!({"appointment": {"_id": "a2", "status": "completed"}}));
        let mut screen = AppointmentsScreen::new(context(&env));
        screen.load().await.unwrap();

        screen.open_status_update("a2");
        let update = screen.status_update().unwrap();
        assert_eq!(update.status, AppointmentStatus::Pending);
        update.status = AppointmentStatus::Completed;
        update.report = Some(StatusReport {
            file_name: "report.pdf".into(),
            bytes: b"%PDF-1.4".to_vec(),
        });
        screen.submit_status_update().await.unwrap();

        let sent = env.backend.last("PATCH", "/appointments/a2/status");
        assert!(sent.header("content-type").unwrap().starts_with("multipart/form-data"));
        let body = sent.body_text();
        assert!(body.contains("completed"));
        assert!(body.contains("report.pdf"));
        assert!(screen.status_update().is_none());
    }

    #[tokio::test]
    async fn history_action_navigates() {
        let env = TestEnv::signed_in().await;
        let screen = AppointmentsScreen::new(context(&env));

        screen.open_history("a1");

        assert_eq!(env.navigator.current(), Route::AppointmentHistory("a1".into()));
    }

    #[tokio::test]
    async fn mount_loads_representative_options() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/appointments", 200, page_body())
            .on(
                "GET",
                "/representatives/dropdown",
                200,
                json!({"data": [{"_id": "r1", "name": "Ali", "isActive": true}, {"_id": "r2", "name": "Old", "isActive": false}]}),
            );
        let mut screen = AppointmentsScreen::new(context(&env));

        screen.mount().await;

        assert_eq!(screen.representatives().len(), 1);
        assert_eq!(screen.appointments().len(), 3);
    }

    #[tokio::test]
    async fn saving_composer_closes_it_and_refetches_current_page() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/appointments", 200, page_body())
            .on(
                "GET",
                "/patients",
                200,
                json!({"patients": [{"_id": "P1", "name": "Sara", "doctorReferred": {"_id": "D1", "name": "Smith"}}]}),
            )
            .on("GET", "/radiologists", 200, json!({"radiologists": [{"_id": "R1", "name": "Hany"}]}))
            .on("GET", "/branches", 200, json!({"branches": [{"_id": "B1", "name": "Downtown"}]}))
            .on(
                "GET",
                "/scans",
                200,
                json!({"scans": [{"_id": "S1", "name": "MRI", "minPrice": 100}, {"_id": "S2", "name": "CT", "minPrice": 150}]}),
            )
            .on("POST", "/appointments", 201, json!({"appointment": {"_id": "A9"}}));
        let mut screen = AppointmentsScreen::new(context(&env));
        screen.set_page(3).await.unwrap();

        screen.open_create().await;
        let composer = screen.composer().unwrap();
        composer.select_patient("P1");
        composer.set_radiologist("R1");
        composer.set_branch("B1");
        composer.set_day(NaiveDate::from_ymd_opt(2025, 5, 10));
        composer.set_time(chrono::NaiveTime::from_hms_opt(10, 30, 0));
        composer.set_line_scan(0, "S1");
        composer.set_line_quantity(0, 2);
        composer.add_line();
        composer.set_line_scan(1, "S2");
        assert_eq!(composer.price_label(), "$350.00");

        let saved = screen.save_composer().await.unwrap();

        assert_eq!(saved.id, "A9");
        assert!(screen.composer().is_none());
        assert_eq!(env.backend.count("GET", "/appointments"), 2);
        assert_eq!(env.backend.last("GET", "/appointments").query_value("page"), Some("3"));
        assert_eq!(env.backend.last("POST", "/appointments").json()["price"], 350.0);
        assert_eq!(
            env.toasts.last().unwrap().message,
            "Appointment created successfully"
        );
    }

    #[tokio::test]
    async fn failed_save_keeps_composer_open() {
        let env = TestEnv::signed_in().await;
        env.backend.on("GET", "/appointments", 200, page_body());
        let mut screen = AppointmentsScreen::new(context(&env));
        screen.load().await.unwrap();

        screen.open_create().await;
        let err = screen.save_composer().await.unwrap_err();

        assert!(err.field_errors().unwrap().has("patient"));
        assert!(screen.composer().is_some());
        assert_eq!(env.backend.count("POST", "/appointments"), 0);
        assert_eq!(env.backend.count("GET", "/appointments"), 1);
    }
}
