//! Scan catalog composer body.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{check, FieldErrors, Mode, Schema};
use crate::pricing::Line;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScanItemPayload {
    #[validate(length(min = 1, message = "Select a stock item"))]
    pub item: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScanPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Minimum price cannot be negative"))]
    pub min_price: f64,
    pub actual_cost: f64,
    #[validate(length(min = 1, message = "Add at least one item"))]
    pub items: Vec<ScanItemPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

impl ScanPayload {
    /// Body from composer lines. Unselected lines keep an empty item so
    /// validation reports them by index.
    pub fn from_lines(
        name: &str,
        min_price: f64,
        actual_cost: f64,
        lines: &[Line],
        description: Option<String>,
        is_active: bool,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            min_price,
            actual_cost,
            items: lines
                .iter()
                .map(|l| ScanItemPayload {
                    item: l.selected.clone().unwrap_or_default(),
                    quantity: l.quantity,
                })
                .collect(),
            description,
            is_active,
        }
    }
}

impl Schema for ScanPayload {
    fn check(&self, mode: Mode) -> Result<(), FieldErrors> {
        let _ = mode;
        let mut errors = check(self).err().unwrap_or_default();
        for (index, item) in self.items.iter().enumerate() {
            if let Err(e) = check(item) {
                errors.nest(&format!("items[{index}]"), e);
            }
        }
        if self.actual_cost <= 0.0 {
            errors.add("actual_cost", "Actual cost must be greater than 0");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cost_is_rejected() {
        let payload = ScanPayload::from_lines("MRI", 100.0, 0.0, &[Line::select("s1", 1)], None, true);
        assert!(payload.check(Mode::Create).unwrap_err().has("actual_cost"));
    }

    #[test]
    fn unselected_line_is_reported_by_index() {
        let payload = ScanPayload::from_lines(
            "MRI",
            100.0,
            25.0,
            &[Line::select("s1", 1), Line::default()],
            None,
            true,
        );
        let errors = payload.check(Mode::Create).unwrap_err();
        assert!(errors.has("items[1].item"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let payload = ScanPayload::from_lines("  ", 100.0, 25.0, &[Line::select("s1", 1)], None, true);
        assert_eq!(payload.check(Mode::Create).unwrap_err().get("name"), Some("Name is required"));
    }
}
