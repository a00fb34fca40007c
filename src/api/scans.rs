use crate::http::{unwrap_entity, ApiClient, ApiError, Form, Method, Part, Query};
use crate::models::{Scan, StockAvailability};
use crate::validation::ScanPayload;

use super::Resource;

pub type ScansApi = Resource<Scan, ScanPayload>;

pub(crate) fn scans(client: &ApiClient) -> ScansApi {
    Resource::new(client, "/scans", "scans", "scan")
}

impl Resource<Scan, ScanPayload> {
    /// `POST /scans/:id/images` (multipart).
    pub async fn add_image(
        &self,
        id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        description: Option<&str>,
    ) -> Result<Scan, ApiError> {
        let mut form = Form::new().part("image", Part::bytes(bytes).file_name(file_name.to_string()));
        if let Some(description) = description {
            form = form.text("description", description.to_string());
        }
        let value = self
            .client()
            .send_multipart(Method::POST, &self.member(&format!("{id}/images")), form)
            .await?;
        self.entity(value)
    }

    pub async fn remove_image(&self, id: &str, image_id: &str) -> Result<(), ApiError> {
        self.client()
            .delete(&self.member(&format!("{id}/images/{image_id}")))
            .await?;
        Ok(())
    }

    /// Whether current stock covers one execution of the scan.
    pub async fn stock_availability(&self, id: &str) -> Result<StockAvailability, ApiError> {
        let value = self
            .client()
            .get_value(&self.member(&format!("{id}/stock-availability")), &Query::new())
            .await?;
        unwrap_entity(value, "availability")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::TestEnv;

    #[tokio::test]
    async fn image_upload_and_removal() {
        let env = TestEnv::signed_in().await;
        env.backend.on(
            "POST",
            "/scans/s1/images",
            201,
            json!({"data": {"_id": "s1", "name": "MRI", "images": [{"_id": "img1", "url": "/u/1.png"}]}}),
        );
        env.backend.on("DELETE", "/scans/s1/images/img1", 200, json!({}));
        let api = scans(&env.client);

        let scan = api.add_image("s1", "1.png", vec![1, 2, 3], Some("axial")).await.unwrap();
        assert_eq!(scan.images[0].id, "img1");
        let body = env.backend.last("POST", "/scans/s1/images").body_text();
        assert!(body.contains("filename=\"1.png\""));
        assert!(body.contains("axial"));

        api.remove_image("s1", "img1").await.unwrap();
        assert_eq!(env.backend.count("DELETE", "/scans/s1/images/img1"), 1);
    }

    #[tokio::test]
    async fn stock_availability_is_decoded() {
        let env = TestEnv::signed_in().await;
        env.backend.on(
            "GET",
            "/scans/s1/stock-availability",
            200,
            json!({"data": {"available": false, "items": [{"itemId": "i1", "name": "Contrast", "required": 2, "available": 1, "sufficient": false}]}}),
        );
        let api = scans(&env.client);

        let availability = api.stock_availability("s1").await.unwrap();
        assert!(!availability.available);
        assert_eq!(availability.shortages().count(), 1);
    }
}
