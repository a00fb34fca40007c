//! Scan catalog index. Listing and delete go through the generic index;
//! create and edit go through [`ScanComposer`] so the actual cost is always
//! derived from the stock lines.

use crate::api::ScansApi;
use crate::http::ApiError;
use crate::models::Scan;
use crate::navigation::Route;
use crate::validation::FieldErrors;
use crate::widgets::SubmitError;

use super::{entity_message, IndexScreen, ScanComposer, ScreenContext, SCANS};

pub struct ScansScreen {
    ctx: ScreenContext,
    list: IndexScreen<ScansApi>,
    composer: Option<ScanComposer>,
}

impl ScansScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        let list = IndexScreen::new(ctx.api.scans.clone(), SCANS, ctx.locale.clone(), ctx.toasts.clone());
        Self {
            ctx,
            list,
            composer: None,
        }
    }

    /// Rows, paging and the delete dialog.
    pub fn list(&self) -> &IndexScreen<ScansApi> {
        &self.list
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.list.load().await
    }

    pub async fn set_search(&mut self, text: &str) -> Result<(), ApiError> {
        self.list.set_search(text).await
    }

    /// `isActive` filter; `None` shows every scan.
    pub async fn set_active_filter(&mut self, active: Option<bool>) -> Result<(), ApiError> {
        let value = active.map(|a| a.to_string()).unwrap_or_default();
        self.list.set_filter("isActive", &value).await
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.list.set_page(page).await
    }

    pub fn open_detail(&self, id: &str) {
        self.ctx.navigator.navigate(Route::ScanDetail(id.to_string()));
    }

    // ── Composer ────────────────────────────────────────────

    pub async fn open_create(&mut self) {
        self.composer = Some(ScanComposer::open(self.ctx.clone(), None).await);
    }

    /// Open the composer on a listed scan. Unknown ids are ignored.
    pub async fn open_edit(&mut self, id: &str) {
        let Some(existing) = self.list.rows().iter().find(|s| s.id == id).cloned() else {
            return;
        };
        self.composer = Some(ScanComposer::open(self.ctx.clone(), Some(&existing)).await);
    }

    pub fn composer(&mut self) -> Option<&mut ScanComposer> {
        self.composer.as_mut()
    }

    pub fn close_composer(&mut self) {
        self.composer = None;
    }

    /// Submit the composer; success closes it and refetches the page.
    pub async fn save_composer(&mut self) -> Result<Scan, SubmitError> {
        let Some(composer) = self.composer.as_mut() else {
            return Err(FieldErrors::single("form", "No open form").into());
        };
        let key = if composer.is_edit() { "updated" } else { "created" };
        let saved = composer.submit().await?;
        tracing::info!(scan = %saved.id, key, "Scan saved");
        self.composer = None;
        self.ctx.toasts.success(entity_message(&self.ctx.locale, key, SCANS.one));
        let _ = self.list.load().await;
        Ok(saved)
    }

    // ── Delete ──────────────────────────────────────────────

    pub fn request_delete(&mut self, id: &str) {
        self.list.request_delete(id);
    }

    pub fn cancel_delete(&mut self) {
        self.list.cancel_delete();
    }

    pub async fn confirm_delete(&mut self) -> bool {
        self.list.confirm_delete().await
    }
}
