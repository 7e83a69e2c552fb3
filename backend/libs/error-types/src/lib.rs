//! Shared error kinds for the marketplace backend.
//!
//! Every repository and service returns [`ServiceResult`]. The variants form a
//! closed set, so HTTP status, error code and error type are derived from the
//! variant instead of from message text.
//!
//! ```ignore
//! match repo.get_realtor(id).await? {
//!     Some(realtor) => Ok(realtor),
//!     None => Err(ServiceError::NotFound(format!("realtor {id}"))),
//! }
//! ```

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Postgres SQLSTATE for unique_violation.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service unavailable")]
    ServiceUnavailable,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) | ServiceError::ValidationError(_) => 400,
            ServiceError::Unauthorized => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict { .. } => 409,
            ServiceError::ServiceUnavailable => 503,
            ServiceError::Database(_) | ServiceError::InternalError(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => error_codes::BAD_REQUEST,
            ServiceError::ValidationError(_) => error_codes::VALIDATION_ERROR,
            ServiceError::Unauthorized => error_codes::UNAUTHORIZED,
            ServiceError::Forbidden(_) => error_codes::FORBIDDEN,
            ServiceError::NotFound(_) => error_codes::NOT_FOUND,
            ServiceError::Conflict { code, .. } => *code,
            ServiceError::Database(_) => error_codes::DATABASE_ERROR,
            ServiceError::InternalError(_) => error_codes::INTERNAL_SERVER_ERROR,
            ServiceError::ServiceUnavailable => error_codes::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) | ServiceError::ValidationError(_) => {
                error_types::VALIDATION_ERROR
            }
            ServiceError::Unauthorized => error_types::AUTHENTICATION_ERROR,
            ServiceError::Forbidden(_) => error_types::AUTHORIZATION_ERROR,
            ServiceError::NotFound(_) => error_types::NOT_FOUND_ERROR,
            ServiceError::Conflict { .. } => error_types::CONFLICT_ERROR,
            ServiceError::Database(_) | ServiceError::InternalError(_) => {
                error_types::SERVER_ERROR
            }
            ServiceError::ServiceUnavailable => error_types::SERVICE_UNAVAILABLE_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: reason_phrase(self.status_code()).to_string(),
            message: self.to_string(),
            status: self.status_code(),
            error_type: self.error_type().to_string(),
            code: self.error_code().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Error")
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ServiceError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) =>
            {
                ServiceError::conflict(error_codes::CONFLICT, db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ServiceError::ServiceUnavailable
            }
            _ => ServiceError::Database(err.to_string()),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(ServiceError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self)).json(self.to_response())
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Reason phrase of the HTTP status
    pub error: String,

    /// Human readable message
    pub message: String,

    /// HTTP status code
    pub status: u16,

    /// Coarse category used by clients for routing, see [`error_types`]
    pub error_type: String,

    /// Stable machine code, see [`error_codes`]
    pub code: String,

    /// RFC 3339
    pub timestamp: String,
}

pub mod error_codes {
    // Generic
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";

    // Realtors
    pub const REALTOR_EMAIL_EXISTS: &str = "REALTOR_EMAIL_EXISTS";

    // Connections & blocks
    pub const CONNECTION_EXISTS: &str = "CONNECTION_EXISTS";
    pub const ALREADY_BLOCKED: &str = "ALREADY_BLOCKED";

    // Jobs
    pub const ALREADY_APPLIED: &str = "ALREADY_APPLIED";

    // Database/System
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
}

pub mod error_types {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const AUTHENTICATION_ERROR: &str = "authentication_error";
    pub const AUTHORIZATION_ERROR: &str = "authorization_error";
    pub const NOT_FOUND_ERROR: &str = "not_found_error";
    pub const CONFLICT_ERROR: &str = "conflict_error";
    pub const SERVER_ERROR: &str = "server_error";
    pub const SERVICE_UNAVAILABLE_ERROR: &str = "service_unavailable_error";
}
