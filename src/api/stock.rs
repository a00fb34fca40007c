use serde_json::json;

use crate::http::{ApiClient, ApiError, Page, Query};
use crate::models::StockItem;
use crate::validation::StockDraft;

use super::Resource;

pub type StockApi = Resource<StockItem, StockDraft>;

pub(crate) fn stock(client: &ApiClient) -> StockApi {
    Resource::new(client, "/stock", "stock", "stock")
}

impl Resource<StockItem, StockDraft> {
    /// Items at or below their minimum threshold.
    pub async fn low_stock(&self, query: &Query) -> Result<Page<StockItem>, ApiError> {
        self.list(&query.clone().flag("lowStock", true)).await
    }

    /// Items past their valid-until date.
    pub async fn expired(&self, query: &Query) -> Result<Page<StockItem>, ApiError> {
        self.list(&query.clone().flag("expired", true)).await
    }

    /// `PATCH /stock/:id/quantity`.
    pub async fn update_quantity(&self, id: &str, quantity: f64) -> Result<StockItem, ApiError> {
        let value = self
            .client()
            .patch(&self.member(&format!("{id}/quantity")), &json!({ "quantity": quantity }))
            .await?;
        self.entity(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::TestEnv;

    #[tokio::test]
    async fn low_stock_and_expired_are_list_flags() {
        let env = TestEnv::signed_in().await;
        env.backend.on("GET", "/stock", 200, json!({"items": []}));
        let api = stock(&env.client);

        api.low_stock(&Query::new()).await.unwrap();
        assert_eq!(env.backend.last("GET", "/stock").query_value("lowStock"), Some("true"));

        api.expired(&Query::new().set("branch", "b1")).await.unwrap();
        let req = env.backend.last("GET", "/stock");
        assert_eq!(req.query_value("expired"), Some("true"));
        assert_eq!(req.query_value("branch"), Some("b1"));
        assert!(req.query_value("lowStock").is_none());
    }

    #[tokio::test]
    async fn quantity_patch() {
        let env = TestEnv::signed_in().await;
        env.backend.on("PATCH", "/stock/i1/quantity", 200, json!({"data": {"_id": "i1", "quantity": 4}}));
        let api = stock(&env.client);

        let item = api.update_quantity("i1", 4.0).await.unwrap();
        assert_eq!(item.quantity, 4.0);
        assert_eq!(env.backend.last("PATCH", "/stock/i1/quantity").json()["quantity"], 4.0);
    }
}
