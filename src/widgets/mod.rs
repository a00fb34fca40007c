//! Reusable view models shared by several screens.

pub mod branch_editor;
pub mod confirm;
pub mod doctor_autocomplete;
pub mod empty_state;
pub mod privilege_editor;
pub mod search_box;
pub mod two_factor;

pub use branch_editor::BranchEditor;
pub use confirm::ConfirmDialog;
pub use doctor_autocomplete::DoctorAutocomplete;
pub use empty_state::EmptyState;
pub use privilege_editor::{PrivilegeEditor, PrivilegeEditorError};
pub use search_box::SearchBox;
pub use two_factor::{TwoFactorDialog, TwoFactorMode};

use crate::http::ApiError;
use crate::validation::FieldErrors;

/// Why a form submission did not go through.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] FieldErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            SubmitError::Api(_) => None,
        }
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            SubmitError::Api(e) => Some(e),
            SubmitError::Invalid(_) => None,
        }
    }

    /// Toast text for an API failure; `None` for inline validation errors.
    pub fn toast_message(&self, fallback: &str) -> Option<String> {
        self.api().map(|e| e.user_message(fallback))
    }
}
