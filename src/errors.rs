use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Error payload shared by every failing endpoint.
///
/// Serializes as `{"name": ..., "httpStatus": ..., "message": ...}` where
/// `name` is a stable machine-readable code (e.g. `FAVORITE_ALREADY_EXIST`)
/// and `httpStatus` is the upper-snake reason phrase ("NOT_FOUND").
/// Domain services define their own error enums and convert into this type
/// at the handler boundary.
#[derive(Debug)]
pub struct ApiError {
    pub name: &'static str,
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Create a new ApiError with a specific code, status, and message.
    pub fn new(name: &'static str, status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for a 400 with the generic validation code.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", StatusCode::BAD_REQUEST, msg)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "name": self.name,
            "httpStatus": status_name(self.status),
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal(err.to_string())
    }
}

/// Success envelope for endpoints that confirm an action rather than return
/// data (`LOGIN_SUCCESS`, `SAVE_FAVORITE_SUCCESS`, ...). Same wire shape as
/// [`ApiError`].
#[derive(Debug)]
pub struct CommonResponse {
    pub name: &'static str,
    pub status: StatusCode,
    pub message: &'static str,
}

impl CommonResponse {
    pub fn new(name: &'static str, status: StatusCode, message: &'static str) -> Self {
        Self {
            name,
            status,
            message,
        }
    }

    /// 200 OK confirmation.
    pub fn ok(name: &'static str, message: &'static str) -> Self {
        Self::new(name, StatusCode::OK, message)
    }

    /// 201 Created confirmation.
    pub fn created(name: &'static str, message: &'static str) -> Self {
        Self::new(name, StatusCode::CREATED, message)
    }
}

impl IntoResponse for CommonResponse {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "name": self.name,
            "httpStatus": status_name(self.status),
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

/// Render a status code the way clients expect it: "NOT_FOUND", "CONFLICT".
fn status_name(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_ascii_uppercase().replace(' ', "_"),
        None => status.as_u16().to_string(),
    }
}
