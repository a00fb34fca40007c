//! Client-side routes and the shared navigator.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Every route the console knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Appointments,
    AppointmentHistory(String),
    Doctors,
    Radiologists,
    Patients,
    PatientDetail(String),
    Scans,
    ScanDetail(String),
    Stock,
    Profile,
    Settings,
    AdminPrivileges,
    AdminBranches,
    AdminRepresentatives,
    AdminAudit,
    NotFound(String),
}

impl Route {
    /// Parse a path (query string and trailing slash ignored).
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword,
            ["dashboard"] => Route::Dashboard,
            ["appointments"] => Route::Appointments,
            ["appointments", id, "history"] => Route::AppointmentHistory(id.to_string()),
            ["doctors"] => Route::Doctors,
            ["radiologists"] => Route::Radiologists,
            ["patients"] => Route::Patients,
            ["patients", id] => Route::PatientDetail(id.to_string()),
            ["scans"] => Route::Scans,
            ["scans", id] => Route::ScanDetail(id.to_string()),
            ["stock"] => Route::Stock,
            ["profile"] => Route::Profile,
            ["settings"] => Route::Settings,
            ["admin", "privileges"] => Route::AdminPrivileges,
            ["admin", "branches"] => Route::AdminBranches,
            ["admin", "representatives"] => Route::AdminRepresentatives,
            ["admin", "audit"] => Route::AdminAudit,
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::ForgotPassword => "/forgot-password".into(),
            Route::ResetPassword => "/reset-password".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::Appointments => "/appointments".into(),
            Route::AppointmentHistory(id) => format!("/appointments/{id}/history"),
            Route::Doctors => "/doctors".into(),
            Route::Radiologists => "/radiologists".into(),
            Route::Patients => "/patients".into(),
            Route::PatientDetail(id) => format!("/patients/{id}"),
            Route::Scans => "/scans".into(),
            Route::ScanDetail(id) => format!("/scans/{id}"),
            Route::Stock => "/stock".into(),
            Route::Profile => "/profile".into(),
            Route::Settings => "/settings".into(),
            Route::AdminPrivileges => "/admin/privileges".into(),
            Route::AdminBranches => "/admin/branches".into(),
            Route::AdminRepresentatives => "/admin/representatives".into(),
            Route::AdminAudit => "/admin/audit".into(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Routes reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::Register | Route::ForgotPassword | Route::ResetPassword
        )
    }

    /// Routes under `/admin`, reserved for super-admins.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Route::AdminPrivileges
                | Route::AdminBranches
                | Route::AdminRepresentatives
                | Route::AdminAudit
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Shared navigation state. Cloning yields another handle to the same
/// history.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<RwLock<Vec<Route>>>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            inner: Arc::new(RwLock::new(vec![start])),
        }
    }

    /// Push a route. Navigating to the current route is a no-op.
    pub fn navigate(&self, route: Route) {
        let Ok(mut history) = self.inner.write() else {
            tracing::error!("Navigator lock poisoned");
            return;
        };
        if history.last() != Some(&route) {
            tracing::debug!(route = %route, "Navigate");
            history.push(route);
        }
    }

    /// Navigate by path.
    pub fn navigate_to(&self, path: &str) {
        self.navigate(Route::parse(path));
    }

    /// Replace the current entry (redirects).
    pub fn replace(&self, route: Route) {
        if let Ok(mut history) = self.inner.write() {
            history.pop();
            history.push(route);
        }
    }

    /// Pop back to the previous route, if any.
    pub fn back(&self) -> Option<Route> {
        let mut history = self.inner.write().ok()?;
        if history.len() > 1 {
            history.pop();
        }
        history.last().cloned()
    }

    pub fn current(&self) -> Route {
        self.inner
            .read()
            .ok()
            .and_then(|h| h.last().cloned())
            .unwrap_or(Route::Dashboard)
    }

    pub fn history(&self) -> Vec<Route> {
        self.inner.read().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}
