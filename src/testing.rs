//! Test support: a programmable fake backend served by axum on an
//! ephemeral local port, and a fully wired client environment around it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::http::ApiClient;
use crate::i18n::{Document, LocaleContext};
use crate::navigation::{Navigator, Route};
use crate::storage::{MemoryStorage, SharedStorage, TOKEN_KEY};
use crate::toast::Toasts;

/// One request as the fake backend saw it. Paths are relative to `/api`.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn query_keys(&self) -> Vec<&str> {
        self.query.iter().map(|(k, _)| k.as_str()).collect()
    }
}

#[derive(Default)]
struct BackendState {
    routes: HashMap<(String, String), (u16, Value)>,
    requests: Vec<Recorded>,
}

type Shared = Arc<Mutex<BackendState>>;

#[derive(Clone)]
pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Answer `method path` with `status` and `body` until replaced.
    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert((method.to_string(), path.to_string()), (status, body));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn last(&self, method: &str, path: &str) -> Recorded {
        self.requests_to(method, path)
            .pop()
            .unwrap_or_else(|| panic!("no {method} {path} recorded"))
    }
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let query = uri
        .query()
        .and_then(|q| reqwest::Url::parse(&format!("http://fake/?{q}")).ok())
        .map(|url| {
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();
    let headers = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                v.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    let mut guard = state.lock().unwrap();
    guard.requests.push(Recorded {
        method: method.as_str().to_string(),
        path: path.clone(),
        query,
        headers,
        body: body.to_vec(),
    });
    let (status, body) = guard
        .routes
        .get(&(method.as_str().to_string(), path.clone()))
        .cloned()
        .unwrap_or((404, json!({ "message": format!("No route for {method} {path}") })));
    drop(guard);

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

/// A client wired to a fresh fake backend with in-memory storage.
pub struct TestEnv {
    pub backend: FakeBackend,
    pub storage: SharedStorage,
    pub navigator: Navigator,
    pub locale: LocaleContext,
    pub toasts: Toasts,
    pub client: ApiClient,
}

impl TestEnv {
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    /// Signed-in environment: a token is already stored.
    pub async fn signed_in() -> Self {
        Self::start_with(&[(TOKEN_KEY, "test-token")]).await
    }

    pub async fn start_with(pairs: &[(&str, &str)]) -> Self {
        let backend = FakeBackend::start().await;
        let storage: SharedStorage = Arc::new(MemoryStorage::with(pairs));
        let navigator = Navigator::new(Route::Dashboard);
        let locale = LocaleContext::load(storage.clone(), Document::new());
        let client = ApiClient::new(
            &backend.base_url,
            storage.clone(),
            locale.clone(),
            navigator.clone(),
        )
        .expect("client");
        Self {
            backend,
            storage,
            navigator,
            locale,
            toasts: Toasts::new(),
            client,
        }
    }
}
