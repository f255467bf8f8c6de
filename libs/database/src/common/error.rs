/// Unified error type for store access
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Errors raised by SeaORM (connectivity, constraint violations, decoding)
    #[cfg(feature = "postgres")]
    #[error("Database query failed: {0}")]
    Query(#[from] sea_orm::DbErr),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

#[cfg(feature = "postgres")]
impl DatabaseError {
    /// Whether the store rejected an update because the target row does not exist
    pub fn is_record_not_updated(&self) -> bool {
        matches!(self, DatabaseError::Query(sea_orm::DbErr::RecordNotUpdated))
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
