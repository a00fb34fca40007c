use chrono::NaiveDate;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::http::{unwrap_entity, ApiClient, ApiError, Page, Query};
use crate::models::{AuditAction, AuditEntry, AuditStats, SortOrder};

/// Filters of the appointment audit log. Unset fields are not sent.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditFilter {
    pub action: Option<AuditAction>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for AuditFilter {
    fn default() -> Self {
        Self {
            action: None,
            start_date: None,
            end_date: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: SortOrder::Desc,
        }
    }
}

impl AuditFilter {
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("action", self.action)
            .opt("startDate", self.start_date.map(|d| d.format("%Y-%m-%d")))
            .opt("endDate", self.end_date.map(|d| d.format("%Y-%m-%d")))
            .page(self.page, self.limit)
            .opt("sortBy", self.sort_by.as_deref())
            .set("sortOrder", self.sort_order)
    }
}

#[derive(Clone)]
pub struct AuditApi {
    client: ApiClient,
}

impl AuditApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// `GET /audit/appointments`.
    pub async fn appointment_logs(&self, filter: &AuditFilter) -> Result<Page<AuditEntry>, ApiError> {
        let value = self
            .client
            .get_value("/audit/appointments", &filter.to_query())
            .await?;
        Page::from_value(value, "logs")
    }

    /// `GET /audit/stats`, optionally bounded by dates.
    pub async fn stats(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<AuditStats, ApiError> {
        let query = Query::new()
            .opt("startDate", start.map(|d| d.format("%Y-%m-%d")))
            .opt("endDate", end.map(|d| d.format("%Y-%m-%d")));
        let value = self.client.get_value("/audit/stats", &query).await?;
        unwrap_entity(value, "stats")
    }
}
