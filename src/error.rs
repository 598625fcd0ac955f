// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 410 Gone (expired/exhausted upload tokens)
    Gone(String),

    // 422 Unprocessable Entity (validation but semantically valid JSON)
    UnprocessableEntity {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Gone(_) => 410,
            ApiError::UnprocessableEntity { .. } => 422,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Gone(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            ApiError::UnprocessableEntity { message, field_errors } => {
                json!({
                    "error": true,
                    "message": message,
                    "code": "UNPROCESSABLE_ENTITY",
                    "field_errors": field_errors
                })
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Gone(_) => "GONE",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn gone(message: impl Into<String>) -> Self {
        ApiError::Gone(message.into())
    }

    pub fn unprocessable_entity(
        message: impl Into<String>,
        field_errors: HashMap<String, String>,
    ) -> Self {
        ApiError::UnprocessableEntity {
            message: message.into(),
            field_errors,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        match err {
            crate::database::manager::DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            crate::database::manager::DatabaseError::ConfigMissing(_)
            | crate::database::manager::DatabaseError::InvalidDatabaseUrl
            | crate::database::manager::DatabaseError::InvalidDatabaseName(_) => {
                tracing::error!("Database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            crate::database::manager::DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            crate::database::manager::DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            other => {
                tracing::error!("SQLx error: {}", other);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::sync::stage::StageParseError> for ApiError {
    fn from(err: crate::sync::stage::StageParseError) -> Self {
        ApiError::validation_error(err.to_string(), None)
    }
}

impl From<crate::services::deals::DealError> for ApiError {
    fn from(err: crate::services::deals::DealError) -> Self {
        use crate::services::deals::DealError;
        match err {
            DealError::NotFound(id) => ApiError::not_found(format!("Deal {} not found", id)),
            DealError::Stage(e) => e.into(),
            DealError::Database(e) => e.into(),
            DealError::Sqlx(e) => e.into(),
        }
    }
}

impl From<crate::services::dealers::DealerError> for ApiError {
    fn from(err: crate::services::dealers::DealerError) -> Self {
        use crate::services::dealers::DealerError;
        match err {
            DealerError::NotFound(id) => ApiError::not_found(format!("Dealer {} not found", id)),
            DealerError::DuplicateName(name) => {
                ApiError::conflict(format!("Dealer '{}' already exists", name))
            }
            DealerError::Database(e) => e.into(),
            DealerError::Sqlx(e) => e.into(),
        }
    }
}

impl From<crate::services::sales::SalesError> for ApiError {
    fn from(err: crate::services::sales::SalesError) -> Self {
        use crate::services::sales::SalesError;
        match err {
            SalesError::NotFound(id) => {
                ApiError::not_found(format!("Sales deal {} not found", id))
            }
            SalesError::Stage(e) => e.into(),
            SalesError::Database(e) => e.into(),
            SalesError::Sqlx(e) => e.into(),
        }
    }
}

impl From<crate::services::sync::SyncError> for ApiError {
    fn from(err: crate::services::sync::SyncError) -> Self {
        use crate::services::sync::SyncError;
        match err {
            SyncError::Database(e) => e.into(),
            SyncError::Sqlx(e) => e.into(),
        }
    }
}

impl From<crate::services::documents::DocumentError> for ApiError {
    fn from(err: crate::services::documents::DocumentError) -> Self {
        use crate::services::documents::DocumentError;
        match err {
            DocumentError::DealNotFound(id) => {
                ApiError::not_found(format!("Deal {} not found", id))
            }
            DocumentError::DocumentNotFound(id) => {
                ApiError::not_found(format!("Document {} not found", id))
            }
            DocumentError::UnresolvedParty { side, reason } => {
                let mut field_errors = HashMap::new();
                field_errors.insert(side.to_string(), reason.to_string());
                ApiError::unprocessable_entity(
                    "Cannot resolve document party from deal data",
                    field_errors,
                )
            }
            DocumentError::Database(e) => e.into(),
            DocumentError::Sqlx(e) => e.into(),
        }
    }
}

impl From<crate::services::tokens::TokenError> for ApiError {
    fn from(err: crate::services::tokens::TokenError) -> Self {
        use crate::services::tokens::TokenError;
        match err {
            TokenError::DealNotFound(id) => ApiError::not_found(format!("Deal {} not found", id)),
            TokenError::UnknownToken => ApiError::forbidden("Upload token not recognized"),
            TokenError::Inactive => ApiError::forbidden("Upload token has been deactivated"),
            TokenError::Expired => ApiError::gone("Upload token has expired"),
            TokenError::AttemptsExhausted => {
                ApiError::gone("Upload token has no attempts remaining")
            }
            TokenError::Database(e) => e.into(),
            TokenError::Sqlx(e) => e.into(),
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("bcrypt error: {}", err);
        ApiError::internal_server_error("Password processing failed")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
