//! Screen view models.
//!
//! Each screen owns its state and is driven through `&mut self`; long
//! operations are `async` and only suspend on backend calls. Nothing is
//! updated optimistically: lists change only after a refetch.

pub mod appointment_composer;
pub mod appointment_history;
pub mod appointments;
pub mod audit_log;
pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod index;
pub mod patient_detail;
pub mod patients;
pub mod privileges;
pub mod scan_composer;
pub mod scan_detail;
pub mod scans;

pub use appointment_composer::AppointmentComposer;
pub use appointment_history::AppointmentHistoryScreen;
pub use appointments::{AppointmentRow, AppointmentStatsTiles, AppointmentsScreen, AppointmentsTab};
pub use audit_log::AuditLogScreen;
pub use auth::{ForgotPasswordScreen, LoginScreen, ProfileScreen, RegisterScreen, ResetPasswordScreen};
pub use branches::BranchesScreen;
pub use dashboard::DashboardScreen;
pub use index::{Editor, IndexScreen, InlineDraft};
pub use patient_detail::PatientDetailScreen;
pub use patients::{PatientEditor, PatientsScreen};
pub use privileges::{PrivilegesScreen, UserPrivilegeRow};
pub use scan_composer::ScanComposer;
pub use scan_detail::ScanDetailScreen;
pub use scans::ScansScreen;

pub use crate::widgets::SubmitError;

use crate::api::Api;
use crate::i18n::LocaleContext;
use crate::navigation::Navigator;
use crate::session::SessionContext;
use crate::toast::Toasts;
use crate::validation::{FieldErrors, Mode, Schema};

/// Shared handles every screen is built from.
#[derive(Clone)]
pub struct ScreenContext {
    pub api: Api,
    pub session: SessionContext,
    pub locale: LocaleContext,
    pub toasts: Toasts,
    pub navigator: Navigator,
}

/// Translation keys naming a resource in toasts and empty states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub one: &'static str,
    pub many: &'static str,
}

impl Entity {
    pub const fn new(one: &'static str, many: &'static str) -> Self {
        Self { one, many }
    }
}

pub const PATIENTS: Entity = Entity::new("entity.patient", "entity.patients");
pub const DOCTORS: Entity = Entity::new("entity.doctor", "entity.doctors");
pub const RADIOLOGISTS: Entity = Entity::new("entity.radiologist", "entity.radiologists");
pub const SCANS: Entity = Entity::new("entity.scan", "entity.scans");
pub const STOCK: Entity = Entity::new("entity.stockItem", "entity.stockItems");
pub const BRANCHES: Entity = Entity::new("entity.branch", "entity.branches");
pub const REPRESENTATIVES: Entity = Entity::new("entity.representative", "entity.representatives");
pub const SCAN_CATEGORIES: Entity = Entity::new("entity.scanCategory", "entity.scanCategories");
pub const USERS: Entity = Entity::new("entity.user", "entity.users");
pub const APPOINTMENTS: Entity = Entity::new("entity.appointment", "entity.appointments");

/// Run `form`'s schema, mirroring the outcome into `errors`.
pub(crate) fn validate_into<F: Schema>(form: &F, mode: Mode, errors: &mut FieldErrors) -> Result<(), SubmitError> {
    match form.check(mode) {
        Ok(()) => {
            *errors = FieldErrors::new();
            Ok(())
        }
        Err(e) => {
            *errors = e.clone();
            Err(e.into())
        }
    }
}

/// `common.<key>` with the entity name substituted.
pub(crate) fn entity_message(locale: &LocaleContext, key: &str, entity: &str) -> String {
    let name = locale.t(entity);
    locale.t_with(&format!("common.{key}"), &[("entity", &name)])
}
