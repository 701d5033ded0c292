//! Request bodies and the JSON error envelope

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::{CoreError, FieldErrors, friendly_auth_message};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_visible: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
}

/// Error response: `{"error": message}` or `{"errors": {field: message}}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn fields(errors: FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: json!({ "errors": errors }),
        }
    }

    pub fn read_only() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Server is in read-only mode")
    }

    /// Auth collaborator failure, rewritten for people
    pub fn auth(status: StatusCode, raw: &str) -> Self {
        Self::new(status, friendly_auth_message(raw))
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::ContentNotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            CoreError::Validation(_) | CoreError::InvalidContentType(_) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            CoreError::InvalidCategory(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            CoreError::Auth(raw) => Self::auth(StatusCode::UNAUTHORIZED, raw),
            CoreError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
            CoreError::Forbidden => Self::new(StatusCode::FORBIDDEN, err.to_string()),
            _ => {
                error!("Request failed: {}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("Invalid upload: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
