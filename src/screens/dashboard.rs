use crate::api::DashboardApi;
use crate::i18n::{format_money, LocaleContext};
use crate::models::{AppointmentStats, DashboardAnalytics, StatsPeriod};
use crate::toast::Toasts;

/// One summary tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub label: String,
    pub value: String,
}

pub struct DashboardScreen {
    api: DashboardApi,
    locale: LocaleContext,
    toasts: Toasts,
    period: StatsPeriod,
    analytics: Option<DashboardAnalytics>,
    stats: Option<AppointmentStats>,
}

impl DashboardScreen {
    pub fn new(api: DashboardApi, locale: LocaleContext, toasts: Toasts) -> Self {
        Self {
            api,
            locale,
            toasts,
            period: StatsPeriod::default(),
            analytics: None,
            stats: None,
        }
    }

    /// Analytics and appointment stats, fetched in parallel. Each half
    /// fails on its own.
    pub async fn load(&mut self) {
        let (analytics, stats) = tokio::join!(
            self.api.analytics(),
            self.api.appointment_stats(self.period)
        );
        match analytics {
            Ok(a) => self.analytics = Some(a),
            Err(e) => self
                .toasts
                .error(e.user_message(&self.locale.t("dashboard.loadFailed"))),
        }
        match stats {
            Ok(s) => self.stats = Some(s),
            Err(e) => self
                .toasts
                .error(e.user_message(&self.locale.t("dashboard.loadFailed"))),
        }
    }

    pub async fn set_period(&mut self, period: StatsPeriod) {
        self.period = period;
        match self.api.appointment_stats(period).await {
            Ok(s) => self.stats = Some(s),
            Err(e) => self
                .toasts
                .error(e.user_message(&self.locale.t("dashboard.loadFailed"))),
        }
    }

    pub fn period(&self) -> StatsPeriod {
        self.period
    }

    pub fn stats(&self) -> Option<&AppointmentStats> {
        self.stats.as_ref()
    }

    pub fn cards(&self) -> Vec<SummaryCard> {
        let Some(a) = &self.analytics else {
            return Vec::new();
        };
        let card = |key: &str, value: String| SummaryCard {
            label: self.locale.t(key),
            value,
        };
        vec![
            card("dashboard.patients", a.total_patients.to_string()),
            card("dashboard.doctors", a.total_doctors.to_string()),
            card("dashboard.appointments", a.total_appointments.to_string()),
            card("dashboard.today", a.today_appointments.to_string()),
            card("dashboard.pending", a.pending_appointments.to_string()),
            card("dashboard.revenue", format_money(a.total_revenue)),
            card("dashboard.lowStock", a.low_stock_items.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::TestEnv;

    #[tokio::test]
    async fn loads_both_halves() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on(
                "GET",
                "/dashboard/analytics",
                200,
                json!({"data": {"totalPatients": 12, "totalRevenue": 1500.5}}),
            )
            .on(
                "GET",
                "/dashboard/appointment-stats",
                200,
                json!({"data": {"period": "week", "series": [{"_id": "Mon", "count": 3}]}}),
            );
        let mut screen = DashboardScreen::new(DashboardApi::new(&env.client), env.locale.clone(), env.toasts.clone());

        screen.load().await;

        let cards = screen.cards();
        assert_eq!(cards[0].value, "12");
        assert!(cards.iter().any(|c| c.value == "$1500.50"));
        assert_eq!(screen.stats().unwrap().series[0].count, 3);
        assert_eq!(
            env.backend.last("GET", "/dashboard/appointment-stats").query_value("period"),
            Some("week")
        );
    }

    #[tokio::test]
    async fn failed_half_is_toasted() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/dashboard/analytics", 500, json!({}))
            .on("GET", "/dashboard/appointment-stats", 200, json!({"period": "week"}));
        let mut screen = DashboardScreen::new(DashboardApi::new(&env.client), env.locale.clone(), env.toasts.clone());

        screen.load().await;

        assert!(screen.cards().is_empty());
        assert!(screen.stats().is_some());
        assert_eq!(env.toasts.drain().len(), 1);
    }
}
