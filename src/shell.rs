//! Application chrome: side navigation, top bar controls and the route
//! outlet.
//!
//! Menu visibility follows the signed-in user's role and privileges. The
//! backend remains the authority; hiding an entry only hides it.

use std::fmt;
use std::str::FromStr;

use crate::api::{DoctorsApi, RadiologistsApi, RepresentativesApi, ScanCategoriesApi, StockApi};
use crate::i18n::{drawer_chevron, Language, Side};
use crate::models::{Role, User};
use crate::navigation::Route;
use crate::screens::{
    self, AppointmentHistoryScreen, AppointmentsScreen, AuditLogScreen, BranchesScreen,
    DashboardScreen, ForgotPasswordScreen, IndexScreen, LoginScreen, PatientDetailScreen,
    PatientsScreen, PrivilegesScreen, ProfileScreen, RegisterScreen, ResetPasswordScreen,
    ScanDetailScreen, ScansScreen, ScreenContext,
};
use crate::storage::{self, SharedStorage, THEME_KEY};
use crate::widgets::EmptyState;

// ═══════════════════════════════════════════════════════════
// Theme
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Navigation menu
// ═══════════════════════════════════════════════════════════

/// Who may see an entry.
#[derive(Debug, Clone, Copy)]
enum Access {
    Everyone,
    /// Listed roles, or anyone holding a privilege on the module.
    Roles(&'static [Role], &'static str),
    SuperAdmin,
}

impl Access {
    fn allows(self, user: &User) -> bool {
        match self {
            Access::Everyone => true,
            Access::Roles(roles, module) => {
                user.is_super_admin() || roles.contains(&user.role) || user.has_module(module)
            }
            Access::SuperAdmin => user.is_super_admin(),
        }
    }
}

struct Entry {
    route: Route,
    label: &'static str,
    icon: &'static str,
    access: Access,
}

fn main_entries() -> Vec<Entry> {
    use Role::{Doctor, Radiologist, Receptionist};
    vec![
        Entry { route: Route::Dashboard, label: "nav.dashboard", icon: "dashboard", access: Access::Everyone },
        Entry { route: Route::Appointments, label: "nav.appointments", icon: "event", access: Access::Everyone },
        Entry { route: Route::Patients, label: "nav.patients", icon: "people", access: Access::Everyone },
        Entry {
            route: Route::Doctors,
            label: "nav.doctors",
            icon: "medical_services",
            access: Access::Roles(&[Receptionist], "doctors"),
        },
        Entry {
            route: Route::Radiologists,
            label: "nav.radiologists",
            icon: "biotech",
            access: Access::Roles(&[Receptionist], "radiologists"),
        },
        Entry {
            route: Route::Scans,
            label: "nav.scans",
            icon: "document_scanner",
            access: Access::Roles(&[Receptionist, Radiologist, Doctor], "scans"),
        },
        Entry { route: Route::Stock, label: "nav.stock", icon: "inventory", access: Access::Roles(&[], "stock") },
    ]
}

fn admin_entries() -> Vec<Entry> {
    [
        (Route::AdminPrivileges, "nav.privileges", "admin_panel_settings"),
        (Route::AdminBranches, "nav.branches", "store"),
        (Route::AdminRepresentatives, "nav.representatives", "badge"),
        (Route::AdminAudit, "nav.audit", "history"),
    ]
    .into_iter()
    .map(|(route, label, icon)| Entry { route, label, icon, access: Access::SuperAdmin })
    .collect()
}

/// One visible menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: String,
    pub icon: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSection {
    /// `None` for the main section.
    pub title: Option<String>,
    pub items: Vec<NavItem>,
}

/// Top-right avatar menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarMenu {
    pub initials: String,
    pub name: String,
    pub role: Role,
    pub items: Vec<(Route, String)>,
    pub logout_label: String,
}

// ═══════════════════════════════════════════════════════════
// Shell
// ═══════════════════════════════════════════════════════════

pub struct Shell {
    ctx: ScreenContext,
    storage: SharedStorage,
    theme: Theme,
    drawer_collapsed: bool,
    menu_open: bool,
}

impl Shell {
    /// Restores the persisted theme.
    pub fn new(ctx: ScreenContext, storage: SharedStorage) -> Self {
        let theme = storage::read_or_none(storage.as_ref(), THEME_KEY)
            .and_then(|t| t.parse().ok())
            .unwrap_or_default();
        Self {
            ctx,
            storage,
            theme,
            drawer_collapsed: false,
            menu_open: false,
        }
    }

    pub fn context(&self) -> &ScreenContext {
        &self.ctx
    }

    pub fn title(&self) -> String {
        self.ctx.locale.t("app.title")
    }

    // ── Drawer ──────────────────────────────────────────────

    /// Menu sections for the current user; empty when signed out.
    pub fn navigation(&self) -> Vec<NavSection> {
        let Some(user) = self.ctx.session.user() else {
            return Vec::new();
        };
        let current = self.ctx.navigator.current();
        let visible = |entries: Vec<Entry>| -> Vec<NavItem> {
            entries
                .into_iter()
                .filter(|e| e.access.allows(&user))
                .map(|e| NavItem {
                    active: is_under(&current, &e.route),
                    label: self.ctx.locale.t(e.label),
                    icon: e.icon,
                    route: e.route,
                })
                .collect()
        };

        let mut sections = vec![NavSection {
            title: None,
            items: visible(main_entries()),
        }];
        let admin = visible(admin_entries());
        if !admin.is_empty() {
            sections.push(NavSection {
                title: Some(self.ctx.locale.t("nav.admin")),
                items: admin,
            });
        }
        sections
    }

    pub fn is_drawer_collapsed(&self) -> bool {
        self.drawer_collapsed
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_collapsed = !self.drawer_collapsed;
    }

    /// Side the collapse chevron points to.
    pub fn drawer_chevron(&self) -> Side {
        drawer_chevron(self.ctx.locale.direction(), self.drawer_collapsed)
    }

    pub fn select(&self, route: Route) {
        self.ctx.navigator.navigate(route);
    }

    // ── Top bar ─────────────────────────────────────────────

    pub fn language(&self) -> Language {
        self.ctx.locale.language()
    }

    /// `(language, label)` pairs for the selector.
    pub fn language_options(&self) -> Vec<(Language, String)> {
        Language::ALL
            .into_iter()
            .map(|l| (l, self.ctx.locale.t(&format!("language.{}", l.code()))))
            .collect()
    }

    pub fn set_language(&self, language: Language) {
        self.ctx.locale.set_language(language);
    }

    pub fn toggle_language(&self) -> Language {
        self.ctx.locale.toggle()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        storage::write_logged(self.storage.as_ref(), THEME_KEY, self.theme.as_str());
        tracing::debug!(theme = %self.theme, "Theme changed");
        self.theme
    }

    pub fn avatar_menu(&self) -> Option<AvatarMenu> {
        let user = self.ctx.session.user()?;
        let t = |key: &str| self.ctx.locale.t(key);
        Some(AvatarMenu {
            initials: user.initials(),
            name: user.display_name().to_string(),
            role: user.role,
            items: vec![
                (Route::Profile, t("menu.profile")),
                (Route::Settings, t("menu.settings")),
            ],
            logout_label: t("menu.logout"),
        })
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Pick an avatar menu entry; closes the menu.
    pub fn open_from_menu(&mut self, route: Route) {
        self.menu_open = false;
        self.ctx.navigator.navigate(route);
    }

    pub async fn logout(&mut self) {
        self.menu_open = false;
        self.ctx.session.logout().await;
    }

    // ── Outlet ──────────────────────────────────────────────

    /// Route that should actually render for `route`: protected routes
    /// need a session, admin routes need a super-admin, and signed-in
    /// users skip the login page.
    pub fn guard(&self, route: &Route) -> Route {
        let signed_in = self.ctx.session.is_authenticated();
        if !route.is_public() && !signed_in {
            return Route::Login;
        }
        if route.is_admin() && !self.ctx.session.is_super_admin() {
            return Route::Dashboard;
        }
        if *route == Route::Login && signed_in {
            return Route::Dashboard;
        }
        route.clone()
    }

    /// Resolve the current location (path plus query) to a screen,
    /// replacing the history entry when a guard redirects.
    pub fn outlet(&self, location: &str) -> Outlet {
        let requested = Route::parse(location);
        let route = self.guard(&requested);
        if route != requested {
            tracing::debug!(from = %requested, to = %route, "Route redirected");
            self.ctx.navigator.replace(route.clone());
        }
        Outlet::build(&route, self.ctx.clone(), location)
    }
}

/// `current` is `route` or one of its detail pages.
fn is_under(current: &Route, route: &Route) -> bool {
    match (current, route) {
        (Route::AppointmentHistory(_), Route::Appointments)
        | (Route::PatientDetail(_), Route::Patients)
        | (Route::ScanDetail(_), Route::Scans) => true,
        _ => current == route,
    }
}

/// `?name=` value of a location, if present.
fn query_param(location: &str, name: &str) -> Option<String> {
    let url = reqwest::Url::parse("http://console.local").ok()?.join(location).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

// ═══════════════════════════════════════════════════════════
// Outlet
// ═══════════════════════════════════════════════════════════

/// The screen mounted for a route.
pub enum Outlet {
    Login(LoginScreen),
    Register(RegisterScreen),
    ForgotPassword(ForgotPasswordScreen),
    ResetPassword(ResetPasswordScreen),
    Dashboard(DashboardScreen),
    Appointments(AppointmentsScreen),
    AppointmentHistory(AppointmentHistoryScreen),
    Doctors(IndexScreen<DoctorsApi>),
    Radiologists(IndexScreen<RadiologistsApi>),
    Patients(PatientsScreen),
    PatientDetail(PatientDetailScreen),
    Scans {
        scans: ScansScreen,
        categories: IndexScreen<ScanCategoriesApi>,
    },
    ScanDetail(ScanDetailScreen),
    Stock(IndexScreen<StockApi>),
    Profile(ProfileScreen),
    /// Language and theme preferences, served by the shell itself.
    Settings,
    Privileges(PrivilegesScreen),
    Branches(BranchesScreen),
    Representatives(IndexScreen<RepresentativesApi>),
    Audit(AuditLogScreen),
    NotFound(EmptyState),
}

impl Outlet {
    fn build(route: &Route, ctx: ScreenContext, location: &str) -> Self {
        let index = |entity: screens::Entity| (ctx.locale.clone(), ctx.toasts.clone(), entity);
        match route {
            Route::Login => Outlet::Login(LoginScreen::new(ctx)),
            Route::Register => Outlet::Register(RegisterScreen::new(ctx)),
            Route::ForgotPassword => Outlet::ForgotPassword(ForgotPasswordScreen::new(ctx)),
            Route::ResetPassword => {
                let token = query_param(location, "token").unwrap_or_default();
                Outlet::ResetPassword(ResetPasswordScreen::new(ctx, &token))
            }
            Route::Dashboard => Outlet::Dashboard(DashboardScreen::new(
                ctx.api.dashboard.clone(),
                ctx.locale.clone(),
                ctx.toasts.clone(),
            )),
            Route::Appointments => Outlet::Appointments(AppointmentsScreen::new(ctx)),
            Route::AppointmentHistory(id) => {
                Outlet::AppointmentHistory(AppointmentHistoryScreen::new(ctx, id))
            }
            Route::Doctors => {
                let (locale, toasts, entity) = index(screens::DOCTORS);
                Outlet::Doctors(IndexScreen::new(ctx.api.doctors.clone(), entity, locale, toasts))
            }
            Route::Radiologists => {
                let (locale, toasts, entity) = index(screens::RADIOLOGISTS);
                Outlet::Radiologists(IndexScreen::new(ctx.api.radiologists.clone(), entity, locale, toasts))
            }
            Route::Patients => Outlet::Patients(PatientsScreen::new(ctx)),
            Route::PatientDetail(id) => Outlet::PatientDetail(PatientDetailScreen::new(ctx, id)),
            Route::Scans => {
                let (locale, toasts, entity) = index(screens::SCAN_CATEGORIES);
                let categories = IndexScreen::new(ctx.api.scan_categories.clone(), entity, locale, toasts);
                Outlet::Scans {
                    scans: ScansScreen::new(ctx),
                    categories,
                }
            }
            Route::ScanDetail(id) => Outlet::ScanDetail(ScanDetailScreen::new(ctx, id)),
            Route::Stock => {
                let (locale, toasts, entity) = index(screens::STOCK);
                Outlet::Stock(IndexScreen::new(ctx.api.stock.clone(), entity, locale, toasts))
            }
            Route::Profile => Outlet::Profile(ProfileScreen::new(ctx)),
            Route::Settings => Outlet::Settings,
            Route::AdminPrivileges => Outlet::Privileges(PrivilegesScreen::new(ctx)),
            Route::AdminBranches => Outlet::Branches(BranchesScreen::new(ctx)),
            Route::AdminRepresentatives => {
                let (locale, toasts, entity) = index(screens::REPRESENTATIVES);
                Outlet::Representatives(IndexScreen::new(
                    ctx.api.representatives.clone(),
                    entity,
                    locale,
                    toasts,
                ))
            }
            Route::AdminAudit => Outlet::Audit(AuditLogScreen::new(ctx)),
            Route::NotFound(_) => Outlet::NotFound(EmptyState::not_found(&ctx.locale)),
        }
    }

    /// Route the outlet renders, for assertions and breadcrumbs.
    pub fn name(&self) -> &'static str {
        match self {
            Outlet::Login(_) => "login",
            Outlet::Register(_) => "register",
            Outlet::ForgotPassword(_) => "forgot-password",
            Outlet::ResetPassword(_) => "reset-password",
            Outlet::Dashboard(_) => "dashboard",
            Outlet::Appointments(_) => "appointments",
            Outlet::AppointmentHistory(_) => "appointment-history",
            Outlet::Doctors(_) => "doctors",
            Outlet::Radiologists(_) => "radiologists",
            Outlet::Patients(_) => "patients",
            Outlet::PatientDetail(_) => "patient-detail",
            Outlet::Scans { .. } => "scans",
            Outlet::ScanDetail(_) => "scan-detail",
            Outlet::Stock(_) => "stock",
            Outlet::Profile(_) => "profile",
            Outlet::Settings => "settings",
            Outlet::Privileges(_) => "privileges",
            Outlet::Branches(_) => "branches",
            Outlet::Representatives(_) => "representatives",
            Outlet::Audit(_) => "audit",
            Outlet::NotFound(_) => "not-found",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::i18n::Direction;
    use crate::models::Privilege;
    use crate::screens::fixtures::context;
    use crate::storage::MemoryStorage;
    use crate::testing::TestEnv;

    fn user(role: Role, privileges: Vec<Privilege>) -> User {
        User {
            id: "u1".into(),
            username: "mona".into(),
            full_name: "Mona Adel".into(),
            role,
            privileges,
            ..User::default()
        }
    }

    fn shell(env: &TestEnv, who: Option<User>) -> Shell {
        let ctx = context(env);
        if let Some(u) = who {
            ctx.session.set_user(u);
        }
        Shell::new(ctx, env.storage.clone())
    }

    fn labels(section: &NavSection) -> Vec<&str> {
        section.items.iter().map(|i| i.label.as_str()).collect()
    }

    #[tokio::test]
    async fn doctor_sees_core_entries_only() {
        let env = TestEnv::signed_in().await;
        let shell = shell(&env, Some(user(Role::Doctor, vec![])));

        let nav = shell.navigation();

        assert_eq!(nav.len(), 1);
        assert_eq!(labels(&nav[0]), vec!["Dashboard", "Appointments", "Patients", "Scans"]);
    }

    #[tokio::test]
    async fn stock_privilege_reveals_stock() {
        let env = TestEnv::signed_in().await;
        let shell = shell(&env, Some(user(Role::Doctor, vec![Privilege::new("stock", "read")])));

        assert!(labels(&shell.navigation()[0]).contains(&"Stock"));
    }

    #[tokio::test]
    async fn super_admin_gets_admin_section() {
        let env = TestEnv::signed_in().await;
        let shell = shell(&env, Some(user(Role::SuperAdmin, vec![])));

        let nav = shell.navigation();

        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].items.len(), 7);
        assert_eq!(nav[1].title.as_deref(), Some("Administration"));
        assert_eq!(labels(&nav[1]), vec!["Privileges", "Branches", "Representatives", "Audit Log"]);
    }

    #[tokio::test]
    async fn detail_route_marks_parent_active() {
        let env = TestEnv::signed_in().await;
        let shell = shell(&env, Some(user(Role::Receptionist, vec![])));
        env.navigator.navigate(Route::PatientDetail("p1".into()));

        let nav = shell.navigation();
        let active: Vec<&Route> = nav[0].items.iter().filter(|i| i.active).map(|i| &i.route).collect();

        assert_eq!(active, vec![&Route::Patients]);
    }

    #[tokio::test]
    async fn chevron_mirrors_under_rtl() {
        let env = TestEnv::signed_in().await;
        let mut shell = shell(&env, None);
        let ltr_open = shell.drawer_chevron();
        shell.toggle_drawer();
        let ltr_collapsed = shell.drawer_chevron();
        assert_ne!(ltr_open, ltr_collapsed);

        shell.toggle_language();
        assert_eq!(env.locale.document().direction(), Direction::Rtl);
        assert_eq!(shell.drawer_chevron(), ltr_collapsed.opposite());
    }

    #[tokio::test]
    async fn theme_toggle_persists() {
        let env = TestEnv::signed_in().await;
        let mut shell = shell(&env, None);
        assert_eq!(shell.theme(), Theme::Light);

        assert_eq!(shell.toggle_theme(), Theme::Dark);

        assert_eq!(env.storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        let restored = Shell::new(context(&env), env.storage.clone());
        assert_eq!(restored.theme(), Theme::Dark);
    }

    #[test]
    fn unknown_stored_theme_is_light() {
        let storage: SharedStorage = Arc::new(MemoryStorage::with(&[(THEME_KEY, "sepia")]));
        let theme = storage::read_or_none(storage.as_ref(), THEME_KEY)
            .and_then(|t| t.parse::<Theme>().ok())
            .unwrap_or_default();
        assert_eq!(theme, Theme::Light);
    }

    #[tokio::test]
    async fn avatar_menu_and_logout() {
        let env = TestEnv::signed_in().await;
        env.backend.on("POST", "/auth/logout", 200, json!({}));
        let mut shell = shell(&env, Some(user(Role::Receptionist, vec![])));

        let menu = shell.avatar_menu().unwrap();
        assert_eq!(menu.initials, "MA");
        assert_eq!(menu.items[0], (Route::Profile, "Profile".to_string()));
        assert_eq!(menu.logout_label, "Logout");

        shell.toggle_menu();
        shell.logout().await;

        assert!(!shell.is_menu_open());
        assert!(shell.avatar_menu().is_none());
        assert_eq!(env.navigator.current(), Route::Login);
    }

    #[tokio::test]
    async fn signed_out_user_is_sent_to_login() {
        let env = TestEnv::start().await;
        let shell = shell(&env, None);

        let outlet = shell.outlet("/patients");

        assert_eq!(outlet.name(), "login");
        assert_eq!(env.navigator.current(), Route::Login);
        assert_eq!(shell.outlet("/forgot-password").name(), "forgot-password");
    }

    #[tokio::test]
    async fn non_admin_on_admin_route_goes_to_dashboard() {
        let env = TestEnv::signed_in().await;
        let shell = shell(&env, Some(user(Role::Receptionist, vec![])));

        assert_eq!(shell.outlet("/admin/audit").name(), "dashboard");
        assert_eq!(shell.outlet("/login").name(), "dashboard");
        assert_eq!(shell.outlet("/patients/p1").name(), "patient-detail");
        assert_eq!(shell.outlet("/nowhere").name(), "not-found");
    }

    #[tokio::test]
    async fn super_admin_reaches_admin_routes() {
        let env = TestEnv::signed_in().await;
        let shell = shell(&env, Some(user(Role::SuperAdmin, vec![])));

        assert_eq!(shell.outlet("/admin/privileges").name(), "privileges");
        assert_eq!(shell.outlet("/admin/branches").name(), "branches");
    }

    #[tokio::test]
    async fn scans_outlet_saves_through_composer() {
        let env = TestEnv::signed_in().await;
        env.backend
            .on("GET", "/scans", 200, json!({"scans": [], "pagination": {"total": 0}}))
            .on("GET", "/stock", 200, json!({"stock": [{"_id": "k1", "name": "Contrast", "price": 12.5}]}))
            .on("POST", "/scans", 201, json!({"scan": {"_id": "s1", "name": "MRI"}}));
        let shell = shell(&env, Some(user(Role::SuperAdmin, vec![])));

        let Outlet::Scans { scans: mut screen, .. } = shell.outlet("/scans") else {
            panic!("scans outlet expected");
        };
        screen.load().await.unwrap();
        screen.open_create().await;
        let composer = screen.composer().unwrap();
        composer.name = "MRI".into();
        composer.min_price = 100.0;
        composer.set_line_item(0, "k1");
        composer.set_line_quantity(0, 4);
        screen.save_composer().await.unwrap();

        assert_eq!(env.backend.last("POST", "/scans").json()["actualCost"], 50.0);
        assert_eq!(env.backend.count("GET", "/scans"), 2);
        assert_eq!(env.toasts.last().unwrap().message, "Scan created successfully");
    }

    #[tokio::test]
    async fn patients_and_branches_outlets_own_their_dialogs() {
        let env = TestEnv::signed_in().await;
        let shell = shell(&env, Some(user(Role::SuperAdmin, vec![])));

        let Outlet::Patients(mut patients) = shell.outlet("/patients") else {
            panic!("patients outlet expected");
        };
        patients.open_create();
        assert!(!patients.editor().unwrap().is_edit());

        let Outlet::Branches(mut branches) = shell.outlet("/admin/branches") else {
            panic!("branches outlet expected");
        };
        branches.open_create();
        assert!(branches.editor().is_some());
    }

    #[test]
    fn reset_token_is_read_from_query() {
        assert_eq!(
            query_param("/reset-password?token=abc%2B1", "token").as_deref(),
            Some("abc+1")
        );
        assert_eq!(query_param("/reset-password", "token"), None);
    }
}
