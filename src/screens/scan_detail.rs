//! `/scans/:id`: a scan catalog entry with its stock availability.

use crate::http::ApiError;
use crate::i18n::format_money;
use crate::models::{Scan, StockAvailability, StockRequirement};
use crate::widgets::EmptyState;

use super::{entity_message, ScreenContext, SCANS};

pub struct ScanDetailScreen {
    ctx: ScreenContext,
    scan_id: String,
    scan: Option<Scan>,
    availability: Option<StockAvailability>,
    loaded: bool,
}

impl ScanDetailScreen {
    pub fn new(ctx: ScreenContext, scan_id: &str) -> Self {
        Self {
            ctx,
            scan_id: scan_id.to_string(),
            scan: None,
            availability: None,
            loaded: false,
        }
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        let api = &self.ctx.api.scans;
        let (scan, availability) = tokio::join!(
            api.get(&self.scan_id),
            api.stock_availability(&self.scan_id),
        );
        self.loaded = true;
        self.availability = match availability {
            Ok(a) => Some(a),
            Err(e) => {
                tracing::warn!(scan = %self.scan_id, error = %e, "Stock availability failed to load");
                None
            }
        };
        match scan {
            Ok(scan) => {
                self.scan = Some(scan);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.scan = None;
                Ok(())
            }
            Err(e) => {
                let fallback = entity_message(&self.ctx.locale, "loadFailed", SCANS.one);
                self.ctx.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }

    pub fn scan(&self) -> Option<&Scan> {
        self.scan.as_ref()
    }

    pub fn availability(&self) -> Option<&StockAvailability> {
        self.availability.as_ref()
    }

    /// Items the current stock cannot cover.
    pub fn shortages(&self) -> Vec<&StockRequirement> {
        self.availability
            .as_ref()
            .map(|a| a.shortages().collect())
            .unwrap_or_default()
    }

    pub fn cost_label(&self) -> String {
        self.scan
            .as_ref()
            .map(|s| format_money(s.actual_cost))
            .unwrap_or_default()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        (self.loaded && self.scan.is_none()).then(|| EmptyState::not_found(&self.ctx.locale))
    }
}
