//! `/admin/privileges`: users with their privilege summary, and the grid
//! editor for one of them.

use crate::config::DEFAULT_PAGE_SIZE;
use crate::http::{ApiError, Query};
use crate::models::{Role, User};
use crate::widgets::{PrivilegeEditor, PrivilegeEditorError, SearchBox};

use super::{entity_message, ScreenContext, USERS};

/// Modules shown inline before the row collapses to a count.
const MODULE_PREVIEW: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPrivilegeRow {
    pub id: String,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub active: bool,
    pub privilege_count: usize,
    pub modules: Vec<String>,
    /// Whether more modules exist than the preview shows.
    pub more_modules: bool,
    pub editable: bool,
}

impl UserPrivilegeRow {
    fn from_user(user: &User) -> Self {
        let modules = user.module_preview(MODULE_PREVIEW + 1);
        Self {
            id: user.id.clone(),
            name: user.display_name().to_string(),
            username: user.username.clone(),
            role: user.role,
            active: user.is_active,
            privilege_count: user.privileges.len(),
            more_modules: modules.len() > MODULE_PREVIEW,
            modules: modules.into_iter().take(MODULE_PREVIEW).collect(),
            editable: !user.is_super_admin(),
        }
    }
}

pub struct PrivilegesScreen {
    ctx: ScreenContext,
    search: SearchBox,
    page: u32,
    users: Vec<User>,
    total: u64,
    editor: Option<PrivilegeEditor>,
}

impl PrivilegesScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            search: SearchBox::new(),
            page: 1,
            users: Vec::new(),
            total: 0,
            editor: None,
        }
    }

    pub fn query(&self) -> Query {
        Query::new()
            .opt("search", self.search.query())
            .page(self.page, DEFAULT_PAGE_SIZE)
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.ctx.api.users.list(&self.query()).await {
            Ok(page) => {
                self.users = page.items;
                self.total = page.total;
                Ok(())
            }
            Err(e) => {
                let fallback = entity_message(&self.ctx.locale, "loadFailed", USERS.many);
                self.ctx.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }

    /// Update the search box; refetch from page 1 when the query changed.
    pub async fn set_search(&mut self, text: &str) -> Result<(), ApiError> {
        if self.search.input(text) {
            self.page = 1;
            return self.load().await;
        }
        Ok(())
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.page = page.max(1);
        self.load().await
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn rows(&self) -> Vec<UserPrivilegeRow> {
        self.users.iter().map(UserPrivilegeRow::from_user).collect()
    }

    /// Open the grid for a user. Super-admins are refused with a toast.
    pub async fn open_editor(&mut self, user_id: &str) -> bool {
        let Some(user) = self.users.iter().find(|u| u.id == user_id) else {
            return false;
        };
        match PrivilegeEditor::open(&self.ctx.api.meta, user).await {
            Ok(editor) => {
                self.editor = Some(editor);
                true
            }
            Err(PrivilegeEditorError::SuperAdmin) => {
                self.ctx.toasts.info(self.ctx.locale.t("privileges.superAdmin"));
                false
            }
            Err(PrivilegeEditorError::Api(e)) => {
                let fallback = self.ctx.locale.t("privileges.loadFailed");
                self.ctx.toasts.error(e.user_message(&fallback));
                false
            }
        }
    }

    pub fn editor(&mut self) -> Option<&mut PrivilegeEditor> {
        self.editor.as_mut()
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Apply the grid's deltas, then close and refetch.
    pub async fn save_editor(&mut self) -> Result<(), ApiError> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        match editor.save(&self.ctx.api.users).await {
            Ok(_) => {
                self.editor = None;
                self.ctx.toasts.success(self.ctx.locale.t("privileges.saved"));
                let _ = self.load().await;
                Ok(())
            }
            Err(e) => {
                let fallback = self.ctx.locale.t("privileges.saveFailed");
                self.ctx.toasts.error(e.user_message(&fallback));
                Err(e)
            }
        }
    }
}
