//! Products API - REST server for the product catalog

use axum_helpers::server::{close_postgres, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        max_connections = config.database.max_connections,
        "Connecting to database"
    );

    let db = connect_from_config_with_retry(config.database.clone()).await?;

    if config.run_migrations {
        run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    }

    let state = AppState {
        config: config.clone(),
        db,
    };

    // Build REST router
    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!(
        port = state.config.server.port,
        "Starting Products API"
    );

    let db = state.db.clone();
    create_production_app(
        app,
        &state.config.server,
        state.config.server.shutdown_timeout,
        async move { close_postgres(db, "products").await },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
