use chrono::NaiveDate;

use crate::http::{ApiClient, ApiError, Form, Method, Part, Query};
use crate::models::{Appointment, AppointmentStatus, AuditEntry};
use crate::validation::AppointmentPayload;

use super::Resource;

pub type AppointmentsApi = Resource<Appointment, AppointmentPayload>;

pub(crate) fn appointments(client: &ApiClient) -> AppointmentsApi {
    Resource::new(client, "/appointments", "appointments", "appointment").patching()
}

/// A PDF report attached to a status update.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Resource<Appointment, AppointmentPayload> {
    /// `PATCH /appointments/:id/status`, multipart with an optional PDF.
    pub async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        notes: Option<&str>,
        report: Option<StatusReport>,
    ) -> Result<Appointment, ApiError> {
        let mut form = Form::new().text("status", status.as_str());
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            form = form.text("notes", notes.to_string());
        }
        if let Some(report) = report {
            let part = Part::bytes(report.bytes)
                .file_name(report.file_name)
                .mime_str("application/pdf")?;
            form = form.part("report", part);
        }
        let value = self
            .client()
            .send_multipart(Method::PATCH, &self.member(&format!("{id}/status")), form)
            .await?;
        self.entity(value)
    }

    /// Audit trail of one appointment.
    pub async fn history(&self, id: &str) -> Result<Vec<AuditEntry>, ApiError> {
        let value = self
            .client()
            .get_value(&self.member(&format!("{id}/history")), &Query::new())
            .await?;
        Ok(crate::http::Page::from_value(value, "history")?.items)
    }

    pub async fn date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, ApiError> {
        let query = Query::new()
            .set("startDate", start.format("%Y-%m-%d"))
            .set("endDate", end.format("%Y-%m-%d"));
        let value = self.client().get_value(&self.member("date-range"), &query).await?;
        Ok(self.page(value)?.items)
    }

    pub async fn by_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>, ApiError> {
        let value = self
            .client()
            .get_value(&self.member(&format!("doctor/{doctor_id}")), &Query::new())
            .await?;
        Ok(self.page(value)?.items)
    }

    pub async fn by_patient(&self, patient_id: &str) -> Result<Vec<Appointment>, ApiError> {
        let value = self
            .client()
            .get_value(&self.member(&format!("patient/{patient_id}")), &Query::new())
            .await?;
        Ok(self.page(value)?.items)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::AuditAction;
    use crate::testing::TestEnv;

    #[tokio::test]
    async fn status_update_is_multipart_with_report() {
        let env = TestEnv::signed_in().await;
        env.backend.on(
            "PATCH",
            "/appointments/a1/status",
            200,
            json!({"data": {"_id": "a1", "status": "completed"}}),
        );
        let api = appointments(&env.client);

        let updated = api
            .update_status(
                "a1",
                AppointmentStatus::Completed,
                Some("done"),
                Some(StatusReport {
                    file_name: "report.pdf".into(),
                    bytes: b"%PDF-1.4".to_vec(),
                }),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, AppointmentStatus::Completed);
        let req = env.backend.last("PATCH", "/appointments/a1/status");
        assert!(req.header("content-type").unwrap().starts_with("multipart/form-data"));
        let body = req.body_text();
        assert!(body.contains("name=\"status\""));
        assert!(body.contains("completed"));
        assert!(body.contains("filename=\"report.pdf\""));
        assert!(body.contains("application/pdf"));
    }

    #[tokio::test]
    async fn status_update_without_report() {
        let env = TestEnv::signed_in().await;
        env.backend.on("PATCH", "/appointments/a1/status", 200, json!({"_id": "a1", "status": "cancelled"}));
        let api = appointments(&env.client);

        api.update_status("a1", AppointmentStatus::Cancelled, None, None).await.unwrap();
        let body = env.backend.last("PATCH", "/appointments/a1/status").body_text();
        assert!(!body.contains("filename="));
        assert!(!body.contains("name=\"notes\""));
    }

    #[tokio::test]
    async fn history_and_lookups() {
        let env = TestEnv::signed_in().await;
        env.backend.on(
            "GET",
            "/appointments/a1/history",
            200,
            json!({"data": [{"_id": "h1", "action": "STATUS_CHANGE", "changes": {}}]}),
        );
        env.backend.on("GET", "/appointments/date-range", 200, json!({"appointments": []}));
        env.backend.on("GET", "/appointments/patient/p1", 200, json!({"appointments": [{"_id": "a1"}]}));
        let api = appointments(&env.client);

        let history = api.history("a1").await.unwrap();
        assert_eq!(history[0].action, AuditAction::StatusChange);

        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        api.date_range(start, end).await.unwrap();
        let req = env.backend.last("GET", "/appointments/date-range");
        assert_eq!(req.query_value("startDate"), Some("2025-05-01"));
        assert_eq!(req.query_value("endDate"), Some("2025-05-31"));

        assert_eq!(api.by_patient("p1").await.unwrap().len(), 1);
    }
}
