//! Checkbox grid over the server's privilege catalog.

use std::collections::BTreeSet;

use crate::api::{MetaApi, UsersApi};
use crate::http::ApiError;
use crate::models::{Privilege, PrivilegeCatalog, User};

#[derive(Debug, thiserror::Error)]
pub enum PrivilegeEditorError {
    #[error("Super admins hold every privilege and cannot be edited")]
    SuperAdmin,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// One row of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRow {
    pub module: String,
    pub operations: Vec<(String, bool)>,
}

pub struct PrivilegeEditor {
    user: User,
    catalog: PrivilegeCatalog,
    original: BTreeSet<Privilege>,
    checked: BTreeSet<Privilege>,
}

impl PrivilegeEditor {
    /// Fetch the catalog and open the editor for `user`.
    pub async fn open(meta: &MetaApi, user: &User) -> Result<Self, PrivilegeEditorError> {
        if user.is_super_admin() {
            return Err(PrivilegeEditorError::SuperAdmin);
        }
        let catalog = meta.privileges().await?;
        Ok(Self::with_catalog(user, catalog))
    }

    pub(crate) fn with_catalog(user: &User, catalog: PrivilegeCatalog) -> Self {
        let original: BTreeSet<Privilege> = user.privileges.iter().cloned().collect();
        Self {
            user: user.clone(),
            catalog,
            checked: original.clone(),
            original,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn is_checked(&self, module: &str, operation: &str) -> bool {
        self.checked.contains(&Privilege::new(module, operation))
    }

    pub fn toggle(&mut self, module: &str, operation: &str) {
        let privilege = Privilege::new(module, operation);
        if !self.checked.remove(&privilege) {
            self.checked.insert(privilege);
        }
    }

    pub fn grid(&self) -> Vec<ModuleRow> {
        self.catalog
            .modules
            .iter()
            .map(|(module, ops)| ModuleRow {
                module: module.clone(),
                operations: ops
                    .iter()
                    .map(|op| (op.clone(), self.is_checked(module, op)))
                    .collect(),
            })
            .collect()
    }

    /// Privileges newly checked.
    pub fn grants(&self) -> Vec<Privilege> {
        self.checked.difference(&self.original).cloned().collect()
    }

    /// Privileges unchecked since opening.
    pub fn revocations(&self) -> Vec<Privilege> {
        self.original.difference(&self.checked).cloned().collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.checked != self.original
    }

    /// Send the deltas. Returns the user's resulting privilege list.
    pub async fn save(&mut self, users: &UsersApi) -> Result<Vec<Privilege>, ApiError> {
        let grants = self.grants();
        let revocations = self.revocations();
        if !grants.is_empty() {
            users.grant_privileges(&self.user.id, &grants).await?;
        }
        if !revocations.is_empty() {
            users.revoke_privileges(&self.user.id, &revocations).await?;
        }
        tracing::info!(
            user = %self.user.id,
            granted = grants.len(),
            revoked = revocations.len(),
            "Privileges updated"
        );
        self.original = self.checked.clone();
        self.user.privileges = self.checked.iter().cloned().collect();
        Ok(self.user.privileges.clone())
    }
}
