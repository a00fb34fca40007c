//! Generic resource index: filters, pagination, editor dialog and
//! confirmed delete over any [`CrudApi`].
//!
//! The editor dialog is only available for drafts marked [`InlineDraft`].
//! Scans, patients and branches list through this screen but edit through
//! their own dialogs.

use crate::api::CrudApi;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::http::{ApiError, Query};
use crate::i18n::LocaleContext;
use crate::models::Identified;
use crate::toast::Toasts;
use crate::validation::{
    DoctorDraft, FieldErrors, Mode, RadiologistDraft, RepresentativeDraft, ScanCategoryDraft, Schema,
    StockDraft, UserDraft,
};
use crate::widgets::{ConfirmDialog, EmptyState, SearchBox, SubmitError};

use super::{entity_message, Entity};

/// Open create/edit dialog.
#[derive(Debug, Clone)]
pub struct Editor<D> {
    /// Id of the record being edited; `None` while creating.
    pub id: Option<String>,
    pub draft: D,
    pub errors: FieldErrors,
}

impl<D> Editor<D> {
    pub fn mode(&self) -> Mode {
        if self.id.is_some() {
            Mode::Edit
        } else {
            Mode::Create
        }
    }
}

/// Drafts edited through the generic editor dialog.
pub trait InlineDraft: Schema + Clone {}

impl InlineDraft for DoctorDraft {}
impl InlineDraft for RadiologistDraft {}
impl InlineDraft for RepresentativeDraft {}
impl InlineDraft for ScanCategoryDraft {}
impl InlineDraft for StockDraft {}
impl InlineDraft for UserDraft {}

pub struct IndexScreen<A: CrudApi> {
    api: A,
    entity: Entity,
    locale: LocaleContext,
    toasts: Toasts,
    filters: Query,
    search: SearchBox,
    page: u32,
    limit: u32,
    rows: Vec<A::Item>,
    total: u64,
    loaded: bool,
    loading: bool,
    editor: Option<Editor<A::Draft>>,
    confirm: ConfirmDialog<String>,
}

impl<A: CrudApi> IndexScreen<A> {
    pub fn new(api: A, entity: Entity, locale: LocaleContext, toasts: Toasts) -> Self {
        Self {
            api,
            entity,
            locale,
            toasts,
            filters: Query::new(),
            search: SearchBox::new(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            rows: Vec::new(),
            total: 0,
            loaded: false,
            loading: false,
            editor: None,
            confirm: ConfirmDialog::new(),
        }
    }

    // ── Listing ─────────────────────────────────────────────

    /// Outgoing list query: filters, search, then pagination.
    pub fn query(&self) -> Query {
        let mut query = self.filters.clone();
        if let Some(text) = self.search.query() {
            query.insert("search", text);
        }
        query.page(self.page, self.limit)
    }

    /// Fetch the current page. A failure leaves the rows untouched.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let result = self.api.list(&self.query()).await;
        self.loading = false;
        match result {
            Ok(page) => {
                self.rows = page.items;
                self.total = page.total;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(entity = self.entity.many, error = %e, "List fetch failed");
                let fallback = entity_message(&self.locale, "loadFailed", self.entity.many);
                self.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.load().await
    }

    /// Set or clear (blank value) a filter field, back to page 1.
    pub async fn set_filter(&mut self, key: &str, value: &str) -> Result<(), ApiError> {
        self.filters.insert(key, value);
        self.page = 1;
        self.load().await
    }

    /// Boolean query flag (`lowStock=true`); off removes the key.
    pub async fn set_flag(&mut self, key: &str, on: bool) -> Result<(), ApiError> {
        if on {
            self.filters.insert(key, "true");
        } else {
            self.filters.remove(key);
        }
        self.page = 1;
        self.load().await
    }

    pub async fn set_search(&mut self, text: &str) -> Result<(), ApiError> {
        if !self.search.input(text) {
            return Ok(());
        }
        self.page = 1;
        self.load().await
    }

    pub async fn clear_filters(&mut self) -> Result<(), ApiError> {
        self.filters = Query::new();
        self.search.clear();
        self.page = 1;
        self.load().await
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.page = page.max(1);
        self.load().await
    }

    pub async fn set_limit(&mut self, limit: u32) -> Result<(), ApiError> {
        self.limit = limit.max(1);
        self.page = 1;
        self.load().await
    }

    pub fn rows(&self) -> &[A::Item] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_text(&self) -> &str {
        self.search.value()
    }

    /// Placeholder when a completed fetch returned nothing.
    pub fn empty_state(&self) -> Option<EmptyState> {
        (self.loaded && self.rows.is_empty())
            .then(|| EmptyState::no_results(&self.locale, &self.locale.t(self.entity.many)))
    }

    // ── Delete ──────────────────────────────────────────────

    pub fn request_delete(&mut self, id: &str) {
        let message = entity_message(&self.locale, "confirmDelete", self.entity.one);
        self.confirm.open(id.to_string(), message);
    }

    pub fn confirm_dialog(&self) -> &ConfirmDialog<String> {
        &self.confirm
    }

    pub fn cancel_delete(&mut self) {
        self.confirm.cancel();
    }

    /// Delete the confirmed target. Returns `false` when nothing was
    /// pending or the call failed.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.confirm.confirm() else {
            return false;
        };
        match self.api.delete(&id).await {
            Ok(()) => {
                tracing::info!(entity = self.entity.one, %id, "Deleted");
                self.toasts.success(entity_message(&self.locale, "deleted", self.entity.one));
                let _ = self.load().await;
                true
            }
            Err(e) => {
                let fallback = entity_message(&self.locale, "deleteFailed", self.entity.one);
                self.toasts.error(e.user_message(&fallback));
                false
            }
        }
    }
}

impl<A> IndexScreen<A>
where
    A: CrudApi,
    A::Draft: InlineDraft,
{
    // ── Editor ──────────────────────────────────────────────

    pub fn open_create(&mut self, draft: A::Draft) {
        self.editor = Some(Editor {
            id: None,
            draft,
            errors: FieldErrors::new(),
        });
    }

    pub fn open_edit(&mut self, item: &A::Item)
    where
        A::Draft: for<'a> From<&'a A::Item>,
    {
        self.editor = Some(Editor {
            id: Some(item.id().to_string()),
            draft: A::Draft::from(item),
            errors: FieldErrors::new(),
        });
    }

    pub fn editor(&self) -> Option<&Editor<A::Draft>> {
        self.editor.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut A::Draft> {
        self.editor.as_mut().map(|e| &mut e.draft)
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Validate and send the open editor. On success the dialog closes and
    /// the current page is refetched; on failure the dialog stays open.
    pub async fn submit(&mut self) -> Result<A::Item, SubmitError> {
        let Some(editor) = self.editor.as_mut() else {
            return Err(FieldErrors::single("form", "No open form").into());
        };
        let mode = editor.mode();
        if let Err(errors) = editor.draft.check(mode) {
            editor.errors = errors.clone();
            return Err(errors.into());
        }
        editor.errors = FieldErrors::new();

        let draft = editor.draft.clone();
        let result = match editor.id.clone() {
            Some(id) => self.api.update(&id, &draft).await,
            None => self.api.create(&draft).await,
        };

        match result {
            Ok(saved) => {
                let key = if mode == Mode::Create { "created" } else { "updated" };
                tracing::info!(entity = self.entity.one, id = saved.id(), ?mode, "Saved");
                self.toasts.success(entity_message(&self.locale, key, self.entity.one));
                self.editor = None;
                let _ = self.load().await;
                Ok(saved)
            }
            Err(e) => {
                let fallback = entity_message(&self.locale, "saveFailed", self.entity.one);
                self.toasts.error(e.user_message(&fallback));
                Err(e.into())
            }
        }
    }
}
