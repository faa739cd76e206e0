use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::books::errors::CatalogError;
use service::users::errors::AuthError;
use tracing::error;

/// Error response rendered as `{"error": ..., "detail": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, detail = ?self.detail, "request failed");
        }
        let body = serde_json::json!({ "error": self.error, "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

fn rejected(status: StatusCode, detail: String) -> JsonApiError {
    let title = status.canonical_reason().unwrap_or("Bad Request");
    JsonApiError::new(status, title, Some(detail))
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self {
        rejected(r.status(), r.body_text())
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(r: QueryRejection) -> Self {
        rejected(r.status(), r.body_text())
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        rejected(r.status(), r.body_text())
    }
}

impl From<CatalogError> for JsonApiError {
    fn from(e: CatalogError) -> Self {
        let (status, title) = match &e {
            CatalogError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            CatalogError::BookNotFound(_) => (StatusCode::NOT_FOUND, "Book not found"),
            CatalogError::ReviewNotFound { .. } => (StatusCode::NOT_FOUND, "Review not found"),
            CatalogError::UnknownUser(_) => (StatusCode::FORBIDDEN, "Unknown user"),
            CatalogError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            CatalogError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error"),
        };
        JsonApiError::new(status, title, Some(e.to_string()))
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let (status, title) = match &e {
            AuthError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            AuthError::UsernameTaken => (StatusCode::CONFLICT, "User already exists"),
            AuthError::UnknownUser => (StatusCode::NOT_FOUND, "User not found"),
            AuthError::WrongPassword => (StatusCode::UNAUTHORIZED, "Wrong password"),
            AuthError::Hashing(_) | AuthError::Token(_) | AuthError::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error")
            }
        };
        JsonApiError::new(status, title, Some(e.to_string()))
    }
}
