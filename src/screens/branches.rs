//! Branch administration: the generic index for listing and delete, the
//! branch editor dialog for create and edit.

use crate::api::BranchesApi;
use crate::http::ApiError;
use crate::models::Branch;
use crate::validation::FieldErrors;
use crate::widgets::{BranchEditor, SubmitError};

use super::{entity_message, IndexScreen, ScreenContext, BRANCHES};

pub struct BranchesScreen {
    ctx: ScreenContext,
    list: IndexScreen<BranchesApi>,
    editor: Option<BranchEditor>,
}

impl BranchesScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        let list = IndexScreen::new(ctx.api.branches.clone(), BRANCHES, ctx.locale.clone(), ctx.toasts.clone());
        Self {
            ctx,
            list,
            editor: None,
        }
    }

    pub fn list(&self) -> &IndexScreen<BranchesApi> {
        &self.list
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.list.load().await
    }

    pub async fn set_search(&mut self, text: &str) -> Result<(), ApiError> {
        self.list.set_search(text).await
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.list.set_page(page).await
    }

    // ── Editor ──────────────────────────────────────────────

    pub fn open_create(&mut self) {
        self.editor = Some(BranchEditor::create());
    }

    pub fn open_edit(&mut self, id: &str) {
        if let Some(branch) = self.list.rows().iter().find(|b| b.id == id) {
            self.editor = Some(BranchEditor::edit(branch));
        }
    }

    pub fn editor(&mut self) -> Option<&mut BranchEditor> {
        self.editor.as_mut()
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Submit the dialog; success closes it and refetches the page, an API
    /// failure toasts and keeps it open.
    pub async fn save_editor(&mut self) -> Result<Branch, SubmitError> {
        let Some(editor) = self.editor.as_mut() else {
            return Err(FieldErrors::single("form", "No open form").into());
        };
        let key = if editor.is_edit() { "updated" } else { "created" };
        let result = editor.save(&self.ctx.api.branches).await;
        match result {
            Ok(saved) => {
                self.editor = None;
                self.ctx.toasts.success(entity_message(&self.ctx.locale, key, BRANCHES.one));
                let _ = self.list.load().await;
                Ok(saved)
            }
            Err(e) => {
                let fallback = entity_message(&self.ctx.locale, "saveFailed", BRANCHES.one);
                if let Some(message) = e.toast_message(&fallback) {
                    self.ctx.toasts.error(message);
                }
                Err(e)
            }
        }
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

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::screens::fixtures::context;
    use crate::testing::TestEnv;

    fn list_body() -> serde_json::Value {
        json!({"branches": [{"_id": "b1", "name": "Central", "location": "Cairo", "isActive": true}],
               "pagination": {"total": 1}})
    }

    #[tokio::test]
    async fn create_through_dialog_toasts_and_refetches() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/branches", 200, list_body())
            .on("POST", "/branches", 201, json!({"branch": {"_id": "b2", "name": "Giza", "location": "Giza"}}));
        let mut screen = BranchesScreen::new(context(&env));
        screen.load().await.unwrap();

        screen.open_create();
        let editor = screen.editor().unwrap();
        editor.draft.name = "Giza".into();
        editor.draft.location = "Giza".into();
        let saved = screen.save_editor().await.unwrap();

        assert_eq!(saved.id, "b2");
        let body = env.backend.last("POST", "/branches").json();
        assert_eq!(body["name"], "Giza");
        assert_eq!(body["isActive"], true);
        assert!(screen.editor().is_none());
        assert_eq!(env.backend.count("GET", "/branches"), 2);
        assert_eq!(env.toasts.last().unwrap().message, "Branch created successfully");
    }

    #[tokio::test]
    async fn edit_prefills_from_row() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/branches", 200, list_body())
            .on("PUT", "/branches/b1", 200, json!({"branch": {"_id": "b1", "name": "Downtown", "location": "Cairo"}}));
        let mut screen = BranchesScreen::new(context(&env));
        screen.load().await.unwrap();

        screen.open_edit("b1");
        let editor = screen.editor().unwrap();
        assert!(editor.is_edit());
        assert_eq!(editor.draft.location, "Cairo");
        editor.draft.name = "Downtown".into();
        screen.save_editor().await.unwrap();

        assert_eq!(env.backend.last("PUT", "/branches/b1").json()["name"], "Downtown");
        assert_eq!(env.toasts.last().unwrap().message, "Branch updated successfully");
    }

    #[tokio::test]
    async fn invalid_dialog_keeps_errors_without_toast() {
        let env = TestEnv::signed_in().await;
        env.backend.on("GET", "/branches", 200, list_body());
        let mut screen = BranchesScreen::new(context(&env));
        screen.load().await.unwrap();

        screen.open_create();
        screen.editor().unwrap().draft.phone = Some("12".into());
        let err = screen.save_editor().await.unwrap_err();

        assert!(err.field_errors().is_some());
        let editor = screen.editor().unwrap();
        assert!(editor.errors().has("name"));
        assert!(editor.errors().has("phone"));
        assert!(env.toasts.is_empty());
        assert_eq!(env.backend.count("POST", "/branches"), 0);
    }

    #[tokio::test]
    async fn rejected_save_toasts_fallback() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/branches", 200, list_body())
            .on("POST", "/branches", 400, json!({}));
        let mut screen = BranchesScreen::new(context(&env));
        screen.load().await.unwrap();

        screen.open_create();
        let editor = screen.editor().unwrap();
        editor.draft.name = "Giza".into();
        editor.draft.location = "Giza".into();
        screen.save_editor().await.unwrap_err();

        assert!(screen.editor().is_some());
        assert_eq!(env.toasts.last().unwrap().message, "Failed to save Branch");
    }
}
