use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use std::fmt;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Standard error body returned by every service and the gateway.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    pub message: String,
    /// Every offending field for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {}", join_violations(.0))]
    ValidationError(Vec<FieldViolation>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintError(String),

    #[error("Database unavailable: {0}")]
    ConnectionError(String),

    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::ValidationError(vec![FieldViolation::new(field, message)])
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", resource, id))
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ConstraintError(_) => StatusCode::CONFLICT,
            Self::ConnectionError(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::AuthError(_) => StatusCode::UNAUTHORIZED,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message suitable for HTTP responses. Internal errors are replaced by a
    /// generic message.
    pub fn response_message(&self) -> String {
        match self {
            Self::ValidationError(_) => "Validation failed".to_string(),
            Self::DatabaseError(_) | Self::InternalError(_) => {
                "Internal server error".to_string()
            }
            Self::ConnectionError(_) => "Database unavailable".to_string(),
            Self::NotFound(message) => message.clone(),
            _ => self.to_string(),
        }
    }
}

/// SQLite reports RESTRICT actions as SQLITE_CONSTRAINT_TRIGGER (1811), which
/// `DbErr::sql_err` does not classify; the message is the same as for 787.
const SQLITE_FOREIGN_KEY_MESSAGE: &str = "FOREIGN KEY constraint failed";

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        if let Some(sql_err) = err.sql_err() {
            return match sql_err {
                SqlErr::UniqueConstraintViolation(msg) => ServiceError::ConstraintError(msg),
                SqlErr::ForeignKeyConstraintViolation(msg) => ServiceError::ConstraintError(msg),
                _ => ServiceError::DatabaseError(err),
            };
        }

        let message = err.to_string();
        if message.contains(SQLITE_FOREIGN_KEY_MESSAGE) {
            return ServiceError::ConstraintError(message);
        }

        match err {
            DbErr::ConnectionAcquire(e) => ServiceError::ConnectionError(e.to_string()),
            DbErr::Conn(e) => ServiceError::ConnectionError(e.to_string()),
            DbErr::RecordNotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::DatabaseError(other),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(crate::validation::flatten_validation_errors(&errors))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let message = self.response_message();
        let errors = match self {
            ServiceError::ValidationError(violations) => violations,
            _ => Vec::new(),
        };

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            errors,
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::NotFound("missing".into()).into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
    }

    #[tokio::test]
    async fn validation_error_lists_every_field() {
        let err = ServiceError::ValidationError(vec![
            FieldViolation::new("customer_code", "is required"),
            FieldViolation::new("selected_items", "must be an array"),
        ]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        let fields: Vec<_> = payload.errors.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["customer_code", "selected_items"]);
    }

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::invalid_field("x", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ConstraintError("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::ConnectionError("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ServiceError::UpstreamError("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        assert_eq!(
            ServiceError::InternalError("secret path".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("syntax".into())).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::NotFound("Order 7 not found".into()).response_message(),
            "Order 7 not found"
        );
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err: ServiceError = DbErr::RecordNotFound("user 9".into()).into();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn restrict_trigger_failure_maps_to_conflict() {
        let err: ServiceError = DbErr::Exec(sea_orm::RuntimeErr::Internal(
            "error returned from database: (code: 1811) FOREIGN KEY constraint failed".into(),
        ))
        .into();
        assert!(matches!(err, ServiceError::ConstraintError(_)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ServiceError = DbErr::Custom("no such table: widgets".into()).into();
        assert!(matches!(err, ServiceError::DatabaseError(_)));
    }
}
