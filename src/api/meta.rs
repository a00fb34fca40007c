use crate::http::{unwrap_entity, ApiClient, ApiError, Query};
use crate::models::PrivilegeCatalog;

#[derive(Clone)]
pub struct MetaApi {
    client: ApiClient,
}

impl MetaApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Modules and the operations the backend recognises for each.
    pub async fn privileges(&self) -> Result<PrivilegeCatalog, ApiError> {
        let value = self.client.get_value("/meta/privileges", &Query::new()).await?;
        unwrap_entity(value, "catalog")
    }
}
