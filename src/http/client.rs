use std::sync::Arc;

use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, Query};
use crate::config::{APP_NAME, APP_VERSION};
use crate::i18n::LocaleContext;
use crate::navigation::{Navigator, Route};
use crate::storage::{self, SharedStorage, TOKEN_KEY, USER_KEY};

/// Paths whose 401 means "wrong credentials" rather than "session gone".
const LOGIN_PATH: &str = "/auth/login";

enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    storage: SharedStorage,
    locale: LocaleContext,
    navigator: Navigator,
}

/// The one configured HTTP session against the REST backend.
///
/// Every request carries `Accept-Language` and, when a token is stored,
/// `Authorization: Bearer`. A 401 outside the login endpoints clears the
/// stored credentials and sends the navigator to `/login`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        storage: SharedStorage,
        locale: LocaleContext,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("{APP_NAME}/{APP_VERSION}"))
            .build()?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                storage,
                locale,
                navigator,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.inner.storage
    }

    pub fn navigator(&self) -> &Navigator {
        &self.inner.navigator
    }

    pub fn token(&self) -> Option<String> {
        storage::read_or_none(self.inner.storage.as_ref(), TOKEN_KEY)
            .filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) {
        storage::write_logged(self.inner.storage.as_ref(), TOKEN_KEY, token);
    }

    /// Forget the token and the cached profile.
    pub fn clear_credentials(&self) {
        storage::remove_logged(self.inner.storage.as_ref(), TOKEN_KEY);
        storage::remove_logged(self.inner.storage.as_ref(), USER_KEY);
    }

    // ═══════════════════════════════════════════════════════════
    // Verbs
    // ═══════════════════════════════════════════════════════════

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T, ApiError> {
        let value = self.get_value(path, query).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_value(&self, path: &str, query: &Query) -> Result<Value, ApiError> {
        self.execute(Method::GET, path, query, Body::Empty).await
    }

    pub async fn post<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = Body::Json(serde_json::to_value(body)?);
        self.execute(Method::POST, path, &Query::new(), body).await
    }

    pub async fn put<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = Body::Json(serde_json::to_value(body)?);
        self.execute(Method::PUT, path, &Query::new(), body).await
    }

    pub async fn patch<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = Body::Json(serde_json::to_value(body)?);
        self.execute(Method::PATCH, path, &Query::new(), body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(Method::DELETE, path, &Query::new(), Body::Empty).await
    }

    /// DELETE carrying a JSON body (privilege revocation).
    pub async fn delete_with_body<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = Body::Json(serde_json::to_value(body)?);
        self.execute(Method::DELETE, path, &Query::new(), body).await
    }

    /// Multipart upload (status update with report, scan images).
    pub async fn send_multipart(&self, method: Method, path: &str, form: Form) -> Result<Value, ApiError> {
        self.execute(method, path, &Query::new(), Body::Multipart(form)).await
    }

    // ═══════════════════════════════════════════════════════════
    // Transport
    // ═══════════════════════════════════════════════════════════

    async fn execute(&self, method: Method, path: &str, query: &Query, body: Body) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self
            .inner
            .http
            .request(method.clone(), &url)
            .header(ACCEPT_LANGUAGE, self.inner.locale.code());
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query.pairs());
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(form) => request.multipart(form),
        };

        tracing::debug!(%method, path, "API request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "API request failed to send");
            ApiError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            return Ok(value);
        }

        tracing::warn!(%method, path, status = status.as_u16(), "API request failed");
        if status.as_u16() == 401 && !path.starts_with(LOGIN_PATH) {
            self.expire_session();
            return Err(ApiError::Unauthorized);
        }
        Err(ApiError::from_status(status.as_u16(), &value))
    }

    fn expire_session(&self) {
        tracing::info!("Session rejected by backend, returning to login");
        self.clear_credentials();
        self.inner.navigator.navigate(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::i18n::Language;
    use crate::testing::TestEnv;

    #[tokio::test]
    async fn sends_bearer_and_language_headers() {
        let env = TestEnv::signed_in().await;
        env.locale.set_language(Language::Ar);
        env.backend.on("GET", "/patients", 200, json!({"items": []}));

        env.client.get_value("/patients", &Query::new()).await.unwrap();

        let req = env.backend.last("GET", "/patients");
        assert_eq!(req.header("authorization"), Some("Bearer test-token"));
        assert_eq!(req.header("accept-language"), Some("ar"));
    }

    #[tokio::test]
    async fn no_authorization_without_token() {
        let env = TestEnv::start().await;
        env.backend.on("GET", "/meta/privileges", 200, json!({}));

        env.client.get_value("/meta/privileges", &Query::new()).await.unwrap();

        let req = env.backend.last("GET", "/meta/privileges");
        assert!(req.header("authorization").is_none());
        assert_eq!(req.header("accept-language"), Some("en"));
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_redirects() {
        let env = TestEnv::start_with(&[(TOKEN_KEY, "stale"), (USER_KEY, "{}")]).await;
        env.navigator.navigate(Route::Patients);
        env.backend.on("GET", "/patients", 401, json!({"message": "jwt expired"}));

        let err = env.client.get_value("/patients", &Query::new()).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(env.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(env.storage.get(USER_KEY).unwrap(), None);
        assert_eq!(env.navigator.current(), Route::Login);
        assert!(env.toasts.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_login_is_an_ordinary_failure() {
        let env = TestEnv::start_with(&[(TOKEN_KEY, "keep")]).await;
        env.backend.on("POST", "/auth/login", 401, json!({"message": "Invalid credentials"}));

        let err = env
            .client
            .post("/auth/login", &json!({"username": "x", "password": "y"}))
            .await
            .unwrap_err();

        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert_eq!(env.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("keep"));
        assert_eq!(env.navigator.current(), Route::Dashboard);
    }

    #[tokio::test]
    async fn forbidden_does_not_end_the_session() {
        let env = TestEnv::signed_in().await;
        env.backend.on("DELETE", "/users/u1", 403, json!({"message": "Forbidden"}));

        let err = env.client.delete("/users/u1").await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(env.client.token().is_some());
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let env = TestEnv::signed_in().await;
        env.backend.on("POST", "/auth/2fa/verify", 429, json!({"message": "Too many attempts"}));

        let err = env.client.post("/auth/2fa/verify", &json!({"token": "123456"})).await.unwrap_err();

        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn query_fields_are_sent_and_blanks_dropped() {
        let env = TestEnv::signed_in().await;
        env.backend.on("GET", "/appointments", 200, json!({"items": []}));

        let query = Query::new().set("status", "completed").set("search", "").page(1, 10);
        env.client.get_value("/appointments", &query).await.unwrap();

        let req = env.backend.last("GET", "/appointments");
        assert_eq!(req.query_value("status"), Some("completed"));
        assert!(!req.query_keys().contains(&"search"));
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let env = TestEnv::signed_in().await;
        env.backend.on("DELETE", "/branches/b1", 204, Value::Null);

        let value = env.client.delete("/branches/b1").await.unwrap();
        assert!(value.is_null());
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let env = TestEnv::start().await;
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let client = ApiClient::new(
            &format!("http://127.0.0.1:{port}/api"),
            env.storage.clone(),
            env.locale.clone(),
            env.navigator.clone(),
        )
        .unwrap();

        let err = client.get_value("/patients", &Query::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
