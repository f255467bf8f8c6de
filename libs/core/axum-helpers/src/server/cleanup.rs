use tracing::{error, info};

/// Close a SeaORM pool during shutdown, logging the outcome
pub async fn close_postgres(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!(pool = name, "Database connection closed"),
        Err(e) => error!(pool = name, error = %e, "Error closing database connection"),
    }
}
