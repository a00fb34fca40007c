use crate::http::{ApiClient, ApiError, Query};
use crate::models::PatientHistoryEntry;
use crate::validation::PatientHistoryDraft;

use super::Resource;

pub type PatientHistoryApi = Resource<PatientHistoryEntry, PatientHistoryDraft>;

pub(crate) fn patient_history(client: &ApiClient) -> PatientHistoryApi {
    Resource::new(client, "/patient-history", "history", "history")
}

impl Resource<PatientHistoryEntry, PatientHistoryDraft> {
    /// `GET /patient-history/patient/:id`.
    pub async fn list_by_patient(&self, patient_id: &str) -> Result<Vec<PatientHistoryEntry>, ApiError> {
        let value = self
            .client()
            .get_value(&self.member(&format!("patient/{patient_id}")), &Query::new())
            .await?;
        Ok(self.page(value)?.items)
    }
}
