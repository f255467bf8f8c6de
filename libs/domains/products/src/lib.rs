//! Products Domain
//!
//! Product catalog over a single relational table, backed by SeaORM.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ UnitOfWork  │  ← One per request, commits staged changes in a transaction
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + SeaORM implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_products::{handlers, ProductUnitOfWorkFactory};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/products").await?;
//!
//! // Every request begins its own unit of work from the factory
//! let router = handlers::router(ProductUnitOfWorkFactory::new(db));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod unit_of_work;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{Product, ProductInput};
pub use repository::{PgProductRepository, ProductRepository};
pub use unit_of_work::{ProductUnitOfWork, ProductUnitOfWorkFactory, UnitOfWork, UnitOfWorkFactory};
