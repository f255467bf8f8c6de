//! Server infrastructure: router assembly with OpenAPI docs, health
//! endpoints, graceful shutdown and pool cleanup.
//!
//! ```ignore
//! use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &server, server.shutdown_timeout, close_postgres(db, "main")).await?;
//! ```

pub mod app;
pub mod cleanup;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router, create_router_with_cors};
pub use cleanup::close_postgres;
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::ShutdownCoordinator;
