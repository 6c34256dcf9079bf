use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// A non-success HTTP answer: the status, the body trimmed for display, and
/// the backend's `detail` message read from the full body.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: String,
    pub detail: Option<String>,
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.detail {
            Some(ref detail) => write!(f, "{}", detail),
            None => write!(f, "{}", self.body),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(ErrorResponse),

    #[error("Unauthorized - credential missing or no longer valid")]
    Unauthorized(ErrorResponse),

    #[error("Access denied: {0}")]
    AccessDenied(ErrorResponse),

    #[error("Resource not found: {0}")]
    NotFound(ErrorResponse),

    #[error("Conflict: {0}")]
    Conflict(ErrorResponse),

    #[error("Validation failed: {0}")]
    Unprocessable(ErrorResponse),

    #[error("Rate limited: {0}")]
    RateLimited(ErrorResponse),

    #[error("Server error: {0}")]
    ServerError(ErrorResponse),

    #[error("Status {status}: {0}", status = .0.status)]
    Http(ErrorResponse),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The request could not be built; nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error payload shape used by the backend (`{"detail": ...}`).
/// `detail` is a string for raised HTTP errors and a list of entries for
/// request validation failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Detail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Entries(Vec<DetailEntry>),
}

#[derive(Debug, Deserialize)]
struct DetailEntry {
    msg: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Message the backend put in its `detail` field, read from the full body
    fn parse_detail(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        let message = match parsed.detail? {
            Detail::Message(message) => message,
            Detail::Entries(entries) => entries.into_iter().find_map(|e| e.msg)?,
        };
        let message = message.trim();
        (!message.is_empty()).then(|| message.to_string())
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let response = ErrorResponse {
            status,
            body: Self::truncate_body(body),
            detail: Self::parse_detail(body),
        };
        match status.as_u16() {
            400 => ApiError::BadRequest(response),
            401 => ApiError::Unauthorized(response),
            403 => ApiError::AccessDenied(response),
            404 => ApiError::NotFound(response),
            409 => ApiError::Conflict(response),
            422 => ApiError::Unprocessable(response),
            429 => ApiError::RateLimited(response),
            500..=599 => ApiError::ServerError(response),
            _ => ApiError::Http(response),
        }
    }

    /// The server's answer, for errors that have one.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            ApiError::BadRequest(r)
            | ApiError::Unauthorized(r)
            | ApiError::AccessDenied(r)
            | ApiError::NotFound(r)
            | ApiError::Conflict(r)
            | ApiError::Unprocessable(r)
            | ApiError::RateLimited(r)
            | ApiError::ServerError(r)
            | ApiError::Http(r) => Some(r),
            ApiError::NetworkError(_) | ApiError::InvalidRequest(_) | ApiError::InvalidResponse(_) => None,
        }
    }

    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::NetworkError(e) => e.status(),
            other => other.response().map(|r| r.status),
        }
    }

    /// True for failures that never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::NetworkError(e) if e.status().is_none())
    }

    /// Human-readable message the backend put in its `detail` field.
    pub fn detail(&self) -> Option<String> {
        self.response().and_then(|r| r.detail.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_variants() {
        assert!(matches!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(StatusCode::FORBIDDEN, ""), ApiError::AccessDenied(_)));
        assert!(matches!(ApiError::from_status(StatusCode::NOT_FOUND, ""), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_status(StatusCode::CONFLICT, ""), ApiError::Conflict(_)));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_GATEWAY, ""), ApiError::ServerError(_)));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, "short and stout"),
            ApiError::Http(_)
        ));
    }

    #[test]
    fn test_status_carried_for_every_http_error() {
        for code in [400u16, 401, 403, 404, 409, 410, 418, 422, 429, 500, 503] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = ApiError::from_status(status, "{}");
            assert_eq!(err.status(), Some(status), "status {}", code);
            assert!(!err.is_transport());
        }
        assert_eq!(ApiError::InvalidResponse("bad json".into()).status(), None);
    }

    #[test]
    fn test_detail_string() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"detail": "email taken"}"#);
        assert_eq!(err.detail().as_deref(), Some("email taken"));
    }

    #[test]
    fn test_detail_on_unlisted_status() {
        let err = ApiError::from_status(StatusCode::GONE, r#"{"detail": "workspace archived"}"#);
        assert_eq!(err.detail().as_deref(), Some("workspace archived"));
        assert_eq!(err.to_string(), "Status 410 Gone: workspace archived");
    }

    #[test]
    fn test_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"}]}"#;
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.detail().as_deref(), Some("value is not a valid email address"));
    }

    #[test]
    fn test_detail_survives_long_body() {
        let detail = "x".repeat(MAX_ERROR_BODY_LENGTH + 100);
        let body = serde_json::json!({"detail": detail}).to_string();
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, &body);

        assert_eq!(err.detail(), Some(detail));
        let response = err.response().unwrap();
        assert!(response.body.contains("truncated"));
    }

    #[test]
    fn test_detail_missing() {
        assert_eq!(ApiError::from_status(StatusCode::BAD_REQUEST, "").detail(), None);
        assert_eq!(ApiError::from_status(StatusCode::BAD_REQUEST, "<html>oops</html>").detail(), None);
        assert_eq!(ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"detail": "   "}"#).detail(), None);
        assert_eq!(ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error": "x"}"#).detail(), None);
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated"));
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));

        // Multi-byte characters straddling the cut must not panic
        let wide = "é".repeat(MAX_ERROR_BODY_LENGTH);
        assert!(ApiError::truncate_body(&wide).contains("truncated"));
    }
}
