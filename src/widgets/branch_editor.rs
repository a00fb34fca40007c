use super::SubmitError;
use crate::api::CrudApi;
use crate::models::{Branch, Identified};
use crate::validation::{BranchDraft, FieldErrors, Mode, Schema};

/// Create/edit dialog for a branch.
#[derive(Debug, Clone, Default)]
pub struct BranchEditor {
    editing: Option<String>,
    pub draft: BranchDraft,
    errors: FieldErrors,
}

impl BranchEditor {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(branch: &Branch) -> Self {
        Self {
            editing: Some(branch.id().to_string()),
            draft: BranchDraft::from(branch),
            errors: FieldErrors::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.editing.is_some() {
            Mode::Edit
        } else {
            Mode::Create
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validate and submit. Inline errors are kept on the editor.
    pub async fn save<A>(&mut self, api: &A) -> Result<Branch, SubmitError>
    where
        A: CrudApi<Item = Branch, Draft = BranchDraft>,
    {
        if let Err(errors) = self.draft.check(self.mode()) {
            self.errors = errors.clone();
            return Err(errors.into());
        }
        self.errors = FieldErrors::new();
        let saved = match &self.editing {
            Some(id) => api.update(id, &self.draft).await?,
            None => api.create(&self.draft).await?,
        };
        tracing::info!(branch = %saved.id, mode = ?self.mode(), "Branch saved");
        Ok(saved)
    }
}
