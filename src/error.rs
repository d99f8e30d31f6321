use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized(Option<String>),

    #[error("Resource not found: {}", .0.as_deref().unwrap_or("no details"))]
    NotFound(Option<String>),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Error body returned by the backend on failed requests: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl AppError {
    /// Build an error from a non-success response status and its raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = parse_detail(body);

        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => AppError::Api { status, message },
        }
    }

    /// The message the backend attached to this error, if it sent one.
    pub fn backend_detail(&self) -> Option<&str> {
        match self {
            AppError::Api { message, .. }
            | AppError::Unauthorized(message)
            | AppError::NotFound(message) => message.as_deref(),
            _ => None,
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Request(e) => e.is_timeout() || e.is_connect(),
            AppError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

/// `detail` is usually a string; FastAPI-style validation replies send a list
/// of objects with a `msg` field instead, in which case the first one is used.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(str::to_string),
        _ => None,
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_kept_verbatim() {
        let err = AppError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Shop with this name already exists"}"#,
        );
        assert_eq!(
            err.backend_detail(),
            Some("Shop with this name already exists")
        );
        assert!(!err.is_transient());
    }

    #[test]
    fn validation_list_uses_first_message() {
        let err = AppError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"}]}"#,
        );
        assert_eq!(err.backend_detail(), Some("field required"));
    }

    #[test]
    fn missing_or_garbled_body_has_no_detail() {
        let err = AppError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.backend_detail(), None);
        assert!(err.is_transient());

        let err = AppError::from_response(StatusCode::BAD_REQUEST, r#"{"detail": "   "}"#);
        assert_eq!(err.backend_detail(), None);
    }

    #[test]
    fn unauthorized_maps_to_dedicated_variant() {
        let err = AppError::from_response(StatusCode::UNAUTHORIZED, r#"{"detail": "nope"}"#);
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.backend_detail(), Some("nope"));
    }

    #[test]
    fn not_found_without_body_has_no_detail() {
        let err = AppError::from_response(StatusCode::NOT_FOUND, "");
        assert!(matches!(err, AppError::NotFound(None)));
        assert_eq!(err.backend_detail(), None);
    }

    #[test]
    fn client_side_validation_is_not_a_backend_detail() {
        let err = AppError::Validation("Please enter shop name".to_string());
        assert_eq!(err.backend_detail(), None);
    }
}
