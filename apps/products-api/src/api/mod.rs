//! API routes module

pub mod health;

use axum::Router;
use domain_products::{handlers, ProductUnitOfWorkFactory};

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new().nest(
        "/products",
        handlers::router(ProductUnitOfWorkFactory::new(state.db.clone())),
    )
}
