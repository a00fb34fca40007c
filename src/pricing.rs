//! Price and cost derivations shared by the appointment and scan composers.
//!
//! Lines reference catalog entries by id; a line without a selection, or
//! whose id is not (yet) in the loaded catalog, contributes nothing.

use serde::{Deserialize, Serialize};

use crate::models::{Identified, Scan, StockItem};

/// A composer line: an optional catalog selection plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub selected: Option<String>,
    pub quantity: u32,
}

impl Line {
    pub fn select(id: &str, quantity: u32) -> Self {
        Self {
            selected: Some(id.to_string()),
            quantity,
        }
    }
}

impl Default for Line {
    /// New lines start empty with quantity 1.
    fn default() -> Self {
        Self {
            selected: None,
            quantity: 1,
        }
    }
}

/// Σ(unit_price(entry) × quantity) over every line with a known selection.
pub fn sum_lines<T: Identified>(lines: &[Line], catalog: &[T], unit_price: impl Fn(&T) -> f64) -> f64 {
    let total: f64 = lines
        .iter()
        .filter_map(|line| {
            let id = line.selected.as_deref()?;
            let entry = catalog.iter().find(|e| e.id() == id)?;
            Some(unit_price(entry) * f64::from(line.quantity))
        })
        .sum();
    round_cents(total)
}

/// Appointment price: Σ(scan.minPrice × quantity).
pub fn appointment_price(lines: &[Line], scans: &[Scan]) -> f64 {
    sum_lines(lines, scans, |scan| scan.min_price)
}

/// Scan actual cost: Σ(stock.price × quantity).
pub fn scan_actual_cost(lines: &[Line], stock: &[StockItem]) -> f64 {
    sum_lines(lines, stock, |item| item.price)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
