use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "radclinic";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend root used when no environment override is present.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Environment variables consulted for the backend root, in order.
pub const API_URL_VARS: &[&str] = &["RADCLINIC_API_URL", "REACT_APP_API_URL"];

/// Quiet period before the doctor autocomplete issues a search.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default page size for index screens.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Resolve the REST backend root from the environment.
pub fn api_base_url() -> String {
    api_base_url_from(|var| std::env::var(var).ok())
}

/// Resolve the backend root with an injectable lookup (tests avoid touching
/// the process environment).
pub fn api_base_url_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    API_URL_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Get the application data directory.
/// `<platform data dir>/radclinic`, falling back to the home directory and
/// finally the working directory on systems without either.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// SQLite file backing the persistent key/value storage.
pub fn storage_path() -> PathBuf {
    app_data_dir().join("local_storage.db")
}

/// Runtime settings resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    /// SQLite storage file; `None` keeps everything in memory.
    pub storage_path: Option<PathBuf>,
}

impl AppConfig {
    /// Backend root from the environment, storage under the app data dir.
    pub fn from_env() -> Self {
        Self {
            api_url: api_base_url(),
            storage_path: Some(storage_path()),
        }
    }

    /// Nothing written to disk.
    pub fn ephemeral(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            storage_path: None,
        }
    }
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "radclinic_lib=info,radclinic=info"
}
