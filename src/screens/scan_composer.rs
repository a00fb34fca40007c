//! Create/edit dialog for a scan catalog entry.
//!
//! Lines reference stock items; the actual cost is derived from them and
//! the loaded stock catalog on every read, never stored separately.

use crate::i18n::format_money;
use crate::models::{Identified, Scan, StockItem};
use crate::pricing::{scan_actual_cost, Line};
use crate::validation::{FieldErrors, Mode, ScanPayload};
use crate::widgets::SubmitError;

use super::{entity_message, validate_into, ScreenContext, SCANS};

pub struct ScanComposer {
    ctx: ScreenContext,
    editing: Option<String>,
    pub name: String,
    pub min_price: f64,
    pub description: String,
    pub is_active: bool,
    lines: Vec<Line>,
    stock: Vec<StockItem>,
    errors: FieldErrors,
}

impl ScanComposer {
    pub async fn open(ctx: ScreenContext, existing: Option<&Scan>) -> Self {
        let stock = match ctx.api.stock.all().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Stock catalog failed to load");
                ctx.toasts.error(e.user_message(&ctx.locale.t("scans.stockFailed")));
                Vec::new()
            }
        };
        let mut composer = Self {
            ctx,
            editing: None,
            name: String::new(),
            min_price: 0.0,
            description: String::new(),
            is_active: true,
            lines: vec![Line::default()],
            stock,
            errors: FieldErrors::new(),
        };
        if let Some(scan) = existing {
            composer.editing = Some(scan.id.clone());
            composer.name = scan.name.clone();
            composer.min_price = scan.min_price;
            composer.description = scan.description.clone().unwrap_or_default();
            composer.is_active = scan.is_active;
            if !scan.items.is_empty() {
                composer.lines = scan
                    .items
                    .iter()
                    .map(|i| Line::select(i.item.id(), i.quantity))
                    .collect();
            }
        }
        composer
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn stock(&self) -> &[StockItem] {
        &self.stock
    }

    /// Option labels for the item dropdowns.
    pub fn stock_options(&self) -> Vec<(String, String)> {
        self.stock
            .iter()
            .map(|s| (s.id().to_string(), s.option_label()))
            .collect()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn add_line(&mut self) {
        self.lines.push(Line::default());
    }

    pub fn can_remove_line(&self) -> bool {
        self.lines.len() >= 2
    }

    /// Drop a line. The last remaining line cannot be removed.
    pub fn remove_line(&mut self, index: usize) -> bool {
        if !self.can_remove_line() || index >= self.lines.len() {
            return false;
        }
        self.lines.remove(index);
        true
    }

    pub fn set_line_item(&mut self, index: usize, item_id: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            line.selected = Some(item_id.to_string()).filter(|id| !id.is_empty());
        }
    }

    pub fn set_line_quantity(&mut self, index: usize, quantity: u32) {
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
    }

    /// Σ(stock.price × quantity) over the current lines.
    pub fn actual_cost(&self) -> f64 {
        scan_actual_cost(&self.lines, &self.stock)
    }

    pub fn cost_label(&self) -> String {
        format_money(self.actual_cost())
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn to_payload(&self) -> ScanPayload {
        let description = Some(self.description.trim().to_string()).filter(|d| !d.is_empty());
        ScanPayload::from_lines(
            &self.name,
            self.min_price,
            self.actual_cost(),
            &self.lines,
            description,
            self.is_active,
        )
    }

    /// Validate and send. The composer keeps its state on failure.
    pub async fn submit(&mut self) -> Result<Scan, SubmitError> {
        let payload = self.to_payload();
        let mode = if self.is_edit() { Mode::Edit } else { Mode::Create };
        validate_into(&payload, mode, &mut self.errors)?;

        let api = &self.ctx.api.scans;
        let result = match &self.editing {
            Some(id) => api.update(id, &payload).await,
            None => api.create(&payload).await,
        };
        result.map_err(|e| {
            let fallback = entity_message(&self.ctx.locale, "saveFailed", SCANS.one);
            self.ctx.toasts.error(e.user_message(&fallback));
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::screens::fixtures::context;
    use crate::testing::TestEnv;

    fn stock_body() -> serde_json::Value {
        json!({"data": {"stock": [
            {"_id": "k1", "name": "Contrast", "price": 20, "unit": "ml"},
            {"_id": "k2", "name": "Film", "price": 7.5}
        ]}})
    }

    async fn composer(env: &TestEnv) -> ScanComposer {
        env.backend.on("GET", "/stock", 200, stock_body());
        ScanComposer::open(context(env), None).await
    }

    #[tokio::test]
    async fn actual_cost_follows_lines() {
        let env = TestEnv::signed_in().await;
        let mut composer = composer(&env).await;
        assert_eq!(composer.actual_cost(), 0.0);

        composer.set_line_item(0, "k1");
        composer.set_line_quantity(0, 2);
        composer.add_line();
        composer.set_line_item(1, "k2");
        assert_eq!(composer.actual_cost(), 47.5);
        assert_eq!(composer.cost_label(), "$47.50");

        composer.set_line_quantity(1, 4);
        assert_eq!(composer.actual_cost(), 70.0);
        assert_eq!(composer.stock_options()[0].1, "Contrast ($20.00 / ml)");
    }

    #[tokio::test]
    async fn last_line_cannot_be_removed() {
        let env = TestEnv::signed_in().await;
        let mut composer = composer(&env).await;

        assert!(!composer.can_remove_line());
        assert!(!composer.remove_line(0));
        composer.add_line();
        assert!(composer.can_remove_line());
        assert!(composer.remove_line(1));
        assert_eq!(composer.lines().len(), 1);
    }

    #[tokio::test]
    async fn zero_cost_blocks_submit() {
        let env = TestEnv::signed_in().await;
        let mut composer = composer(&env).await;
        composer.name = "MRI Brain".into();
        composer.min_price = 100.0;
        composer.set_line_item(0, "unknown");

        let err = composer.submit().await.unwrap_err();

        assert!(err.field_errors().unwrap().has("actual_cost"));
        assert!(composer.errors().has("actual_cost"));
        assert_eq!(env.backend.count("POST", "/scans"), 0);
    }

    #[tokio::test]
    async fn missing_name_and_item_are_reported() {
        let env = TestEnv::signed_in().await;
        let mut composer = composer(&env).await;

        let err = composer.submit().await.unwrap_err();

        let errors = err.field_errors().unwrap();
        assert!(errors.has("name"));
        assert!(errors.has("items[0].item"));
    }

    #[tokio::test]
    async fn valid_scan_posts_derived_cost() {
        let env = TestEnv::signed_in().await;
        env.backend.on(
            "POST",
            "/scans",
            201,
            json!({"data": {"scan": {"_id": "s9", "name": "MRI Brain", "actualCost": 40}}}),
        );
        let mut composer = composer(&env).await;
        composer.name = " MRI Brain ".into();
        composer.min_price = 120.0;
        composer.set_line_item(0, "k1");
        composer.set_line_quantity(0, 2);

        let saved = composer.submit().await.unwrap();

        assert_eq!(saved.id, "s9");
        let body = env.backend.last("POST", "/scans").json();
        assert_eq!(body["name"], "MRI Brain");
        assert_eq!(body["actualCost"], 40.0);
        assert_eq!(body["minPrice"], 120.0);
        assert_eq!(body["items"], json!([{"item": "k1", "quantity": 2}]));
        assert!(body.get("description").is_none());
    }

    #[tokio::test]
    async fn edit_prefills_and_puts() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/stock", 200, stock_body())
            .on("PUT", "/scans/s1", 200, json!({"scan": {"_id": "s1", "name": "CT"}}));
        let scan: Scan = serde_json::from_value(json!({
            "_id": "s1", "name": "CT", "minPrice": 90,
            "items": [{"item": {"_id": "k2", "name": "Film", "price": 7.5}, "quantity": 2}]
        }))
        .unwrap();
        let mut composer = ScanComposer::open(context(&env), Some(&scan)).await;

        assert!(composer.is_edit());
        assert_eq!(composer.actual_cost(), 15.0);
        composer.submit().await.unwrap();

        assert_eq!(env.backend.last("PUT", "/scans/s1").json()["actualCost"], 15.0);
    }

    #[tokio::test]
    async fn server_failure_keeps_state_and_toasts() {
        let env = TestEnv::signed_in().await;
        env.backend.on("POST", "/scans", 409, json!({"message": "Scan name already exists"}));
        let mut composer = composer(&env).await;
        composer.name = "MRI".into();
        composer.set_line_item(0, "k2");

        let err = composer.submit().await.unwrap_err();

        assert!(err.api().is_some());
        assert_eq!(composer.name, "MRI");
        assert_eq!(env.toasts.last().unwrap().message, "Scan name already exists");
    }
}
