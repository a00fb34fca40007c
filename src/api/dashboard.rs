use crate::http::{unwrap_entity, ApiClient, ApiError, Query};
use crate::models::{AppointmentStats, DashboardAnalytics, StatsPeriod};

#[derive(Clone)]
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    pub async fn analytics(&self) -> Result<DashboardAnalytics, ApiError> {
        let value = self
            .client
            .get_value("/dashboard/analytics", &Query::new())
            .await?;
        unwrap_entity(value, "analytics")
    }

    pub async fn appointment_stats(&self, period: StatsPeriod) -> Result<AppointmentStats, ApiError> {
        let value = self
            .client
            .get_value("/dashboard/appointment-stats", &Query::new().set("period", period))
            .await?;
        unwrap_entity(value, "stats")
    }
}
