pub mod api;
pub mod config;
pub mod db;
pub mod http;
pub mod i18n;
pub mod models;
pub mod navigation;
pub mod pricing;
pub mod screens;
pub mod session;
pub mod shell;
pub mod storage;
pub mod toast;
pub mod validation;
pub mod widgets;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::Api;
use crate::config::AppConfig;
use crate::db::DatabaseError;
use crate::http::{ApiClient, ApiError};
use crate::i18n::{Document, LocaleContext};
use crate::navigation::{Navigator, Route};
use crate::screens::ScreenContext;
use crate::session::SessionContext;
use crate::shell::{Outlet, Shell};
use crate::storage::{MemoryStorage, SharedStorage, SqliteStorage};
use crate::toast::Toasts;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Local storage unavailable: {0}")]
    Storage(#[from] DatabaseError),
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] ApiError),
}

/// Install the fmt subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// The wired console: storage, shared contexts, client and shell.
pub struct App {
    storage: SharedStorage,
    session: SessionContext,
    shell: Shell,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let storage: SharedStorage = match &config.storage_path {
            Some(path) => Arc::new(SqliteStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        let document = Document::new();
        let locale = LocaleContext::load(storage.clone(), document);
        let navigator = Navigator::new(Route::Dashboard);
        let client = ApiClient::new(&config.api_url, storage.clone(), locale.clone(), navigator.clone())?;
        let session = SessionContext::new(&client);
        let ctx = ScreenContext {
            api: Api::new(&client),
            session: session.clone(),
            locale,
            toasts: Toasts::new(),
            navigator,
        };
        tracing::info!(api = %client.base_url(), "Console wired");
        Ok(Self {
            shell: Shell::new(ctx, storage.clone()),
            storage,
            session,
        })
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    /// Restore the session from the stored token, then mount the screen
    /// for the current route.
    pub async fn start(&self) -> Outlet {
        self.session.bootstrap().await;
        let current = self.shell.context().navigator.current();
        self.shell.outlet(&current.path())
    }

    /// Navigate to `location` and mount its screen.
    pub fn open(&self, location: &str) -> Outlet {
        self.shell.context().navigator.navigate_to(location);
        self.shell.outlet(location)
    }
}

/// Binary entry point body.
pub async fn run() -> Result<(), AppError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app = App::new(&AppConfig::from_env())?;
    let outlet = app.start().await;
    tracing::info!(screen = outlet.name(), "Console ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::TOKEN_KEY;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn signed_out_start_lands_on_login() {
        let backend = FakeBackend::start().await;
        let app = App::new(&AppConfig::ephemeral(&backend.base_url)).unwrap();

        let outlet = app.start().await;

        assert_eq!(outlet.name(), "login");
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn stored_token_restores_session() {
        let backend = FakeBackend::start().await;
        backend.on(
            "GET",
            "/auth/me",
            200,
            json!({"user": {"_id": "u1", "username": "root", "role": "superAdmin"}}),
        );
        let app = App::new(&AppConfig::ephemeral(&backend.base_url)).unwrap();
        app.storage().set(TOKEN_KEY, "t0k").unwrap();

        let outlet = app.start().await;

        assert_eq!(outlet.name(), "dashboard");
        assert!(app.session().is_super_admin());
        assert_eq!(app.open("/admin/audit").name(), "audit");
    }

    #[test]
    fn sqlite_storage_file_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            api_url: "http://127.0.0.1:9/api".into(),
            storage_path: Some(tmp.path().join("nested").join("local_storage.db")),
        };

        let app = App::new(&config).unwrap();
        app.storage().set("marker", "1").unwrap();

        assert!(tmp.path().join("nested").join("local_storage.db").exists());
    }

    #[test]
    fn tracing_init_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
