//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),
    #[error("reserved field name: '{0}'")]
    ReservedField(String),
    #[error("duplicate field: '{0}'")]
    DuplicateField(String),
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("env {name}: {message}")]
    Env { name: &'static str, message: String },
}

/// Failures of the persistence layer. Details are logged, never sent to clients.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("cannot encode field '{field}': {message}")]
    Encode { field: String, message: String },
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// One constraint violation on a submitted payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every way a CRUD operation can fail. Handlers map these onto status codes.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("resource {0} not found")]
    NotFound(u64),
    #[error("malformed id: '{0}'")]
    MalformedId(String),
    #[error("validation failed: {}", join_reasons(.0))]
    ValidationFailed(Vec<FieldError>),
    #[error("storage failure")]
    StorageFailed(#[from] StoreError),
}

fn join_reasons(reasons: &[FieldError]) -> String {
    reasons
        .iter()
        .map(|r| format!("{} {}", r.field, r.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Transport-level failure: either a body the JSON extractor refused or a service outcome.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("invalid request body: {}", .0.body_text())]
    Rejected(#[from] JsonRejection),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

fn error_response(
    status: StatusCode,
    code: &str,
    message: String,
    details: Option<serde_json::Value>,
) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: code.to_string(),
            message,
            details,
        },
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            ServiceError::MalformedId(_) => (StatusCode::BAD_REQUEST, "malformed_id", None),
            ServiceError::ValidationFailed(reasons) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                serde_json::to_value(reasons).ok(),
            ),
            ServiceError::StorageFailed(cause) => {
                tracing::error!(error = %cause, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
        };
        error_response(status, code, self.to_string(), details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Service(e) => e.into_response(),
            // Unreadable bodies are 400; only the size limit keeps 413.
            AppError::Rejected(rejection) => {
                let status = match rejection.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                let message = format!("invalid request body: {}", rejection.body_text());
                error_response(status, "bad_request", message, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failure_message_hides_cause() {
        let err = ServiceError::from(StoreError::Corrupt("column title is null".into()));
        assert_eq!(err.to_string(), "storage failure");
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (ServiceError::NotFound(7), StatusCode::NOT_FOUND),
            (ServiceError::MalformedId("x".into()), StatusCode::BAD_REQUEST),
            (
                ServiceError::ValidationFailed(vec![FieldError::new("title", "is required")]),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::StorageFailed(StoreError::Poisoned),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn validation_message_lists_reasons() {
        let err = ServiceError::ValidationFailed(vec![
            FieldError::new("title", "is required"),
            FieldError::new("content", "must not be empty"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: title is required; content must not be empty"
        );
    }
}
