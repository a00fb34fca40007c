//! Client-side error taxonomy for backend calls.

use serde_json::Value;

/// Failure of one backend call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 401 outside the login endpoints. The stored token has already been
    /// cleared and the navigator sent to `/login` when this is returned.
    #[error("Authentication required")]
    Unauthorized,
    /// 429, chiefly from the two-factor endpoints.
    #[error("Rate limit exceeded")]
    RateLimited { message: Option<String> },
    /// Any other non-success status. `message` is the body's `message`.
    #[error("Server returned {status}")]
    Server { status: u16, message: Option<String> },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a failed response.
    pub(crate) fn from_status(status: u16, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        match status {
            429 => ApiError::RateLimited { message },
            _ => ApiError::Server { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    /// The server-supplied `message`, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::RateLimited { message } | ApiError::Server { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// What a screen shows: the server message, else its own fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_message_is_preferred() {
        let err = ApiError::from_status(400, &json!({"message": "Phone already registered"}));
        assert_eq!(err.user_message("Failed to save"), "Phone already registered");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn fallback_when_body_has_no_message() {
        let err = ApiError::from_status(500, &json!("Internal Server Error"));
        assert_eq!(err.user_message("Failed to save"), "Failed to save");
        assert_eq!(
            ApiError::Network("refused".into()).user_message("Failed to load"),
            "Failed to load"
        );
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        let err = ApiError::from_status(429, &json!({"message": "slow down"}));
        assert!(err.is_rate_limited());
        assert_eq!(err.server_message(), Some("slow down"));
    }
}
