//! Error codes carried in every [`ErrorResponse`](super::ErrorResponse).
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier for clients, an integer for
//! logs and dashboards, and a default message.
//!
//! Ranges:
//! - 1000-1999: request and generic server errors
//! - 2000-2999: store errors
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::InvalidPath.as_str(), "INVALID_PATH");
//! assert_eq!(ErrorCode::InvalidPath.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body parsed but failed field validation
    ValidationError,
    /// Path segment could not be parsed into the route's parameter type
    InvalidPath,
    /// Body missing, not JSON, or not the expected shape
    JsonExtraction,
    NotFound,
    InternalError,
    ServiceUnavailable,

    /// Row targeted by an update or lookup does not exist
    DatabaseNotFound,
    /// Could not reach the store
    DatabaseConnection,
    /// Query or statement rejected by the store
    DatabaseError,
    /// No pooled connection became available in time
    DatabasePoolTimeout,
    DatabaseUnhandled,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidPath => "INVALID_PATH",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseConnection => "DATABASE_CONNECTION",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
            Self::DatabaseUnhandled => "DATABASE_UNHANDLED",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidPath => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::ServiceUnavailable => 1011,

            Self::DatabaseNotFound => 2001,
            Self::DatabaseConnection => 2002,
            Self::DatabaseError => 2003,
            Self::DatabasePoolTimeout => 2013,
            Self::DatabaseUnhandled => 2099,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidPath => "Invalid path parameter",
            Self::JsonExtraction => "Request body is missing or malformed",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseNotFound => "Record not found",
            Self::DatabaseConnection => "Database is unreachable",
            Self::DatabaseError => "A database error occurred",
            Self::DatabasePoolTimeout => "Database is busy, try again later",
            Self::DatabaseUnhandled => "An unexpected database error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
