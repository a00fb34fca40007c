use serde_json::json;

use crate::http::{unwrap_entity, ApiClient, ApiError, Query};
use crate::models::{Representative, RepresentativeStats};
use crate::validation::RepresentativeDraft;

use super::Resource;

pub type RepresentativesApi = Resource<Representative, RepresentativeDraft>;

pub(crate) fn representatives(client: &ApiClient) -> RepresentativesApi {
    Resource::new(client, "/representatives", "representatives", "representative")
}

impl Resource<Representative, RepresentativeDraft> {
    /// Top representatives by referred volume.
    pub async fn top(&self, limit: u32) -> Result<Vec<Representative>, ApiError> {
        let value = self
            .client()
            .get_value(&self.member("top"), &Query::new().set("limit", limit))
            .await?;
        Ok(self.page(value)?.items)
    }

    pub async fn stats(&self, id: &str) -> Result<RepresentativeStats, ApiError> {
        let value = self
            .client()
            .get_value(&self.member(&format!("{id}/stats")), &Query::new())
            .await?;
        unwrap_entity(value, "stats")
    }

    /// Ask the backend to recompute doctor and patient counts.
    pub async fn recalculate_counts(&self) -> Result<(), ApiError> {
        self.client()
            .post(&self.member("recalculate-counts"), &json!({}))
            .await?;
        Ok(())
    }

    /// Active representatives for filter dropdowns.
    pub async fn active_dropdown(&self) -> Result<Vec<Representative>, ApiError> {
        let value = self
            .client()
            .get_value(&self.member("dropdown"), &Query::new())
            .await?;
        let items = self.page(value)?.items;
        Ok(items.into_iter().filter(|r| r.is_active).collect())
    }
}
