//! Unit of work: one per request, committing every staged change in a single
//! store transaction.

use async_trait::async_trait;
use database::Flushed;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, warn};

use crate::error::ProductResult;
use crate::models::Product;
use crate::repository::{PgProductRepository, ProductRepository};

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Products: ProductRepository;

    fn products(&self) -> &Self::Products;

    /// Commit every staged change atomically.
    ///
    /// Reports how many changes applied and the products inserted, with their
    /// store-assigned ids. On failure nothing is persisted and the staged
    /// changes are gone.
    async fn save(&self) -> ProductResult<Flushed<Product>>;
}

/// Hands out a fresh [`UnitOfWork`] per request
pub trait UnitOfWorkFactory: Clone + Send + Sync + 'static {
    type Work: UnitOfWork + 'static;

    fn begin(&self) -> Self::Work;
}

pub struct ProductUnitOfWork {
    db: DatabaseConnection,
    products: PgProductRepository,
}

impl ProductUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            products: PgProductRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for ProductUnitOfWork {
    type Products = PgProductRepository;

    fn products(&self) -> &PgProductRepository {
        &self.products
    }

    async fn save(&self) -> ProductResult<Flushed<Product>> {
        let txn = self.db.begin().await?;

        match self.products.flush(&txn).await {
            Ok(flushed) => {
                txn.commit().await?;
                info!(applied = flushed.applied, "Unit of work committed");
                Ok(flushed)
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    warn!(error = %rollback, "Rollback failed");
                }
                warn!(error = %e, "Unit of work rolled back");
                Err(e.into())
            }
        }
    }
}

impl Drop for ProductUnitOfWork {
    fn drop(&mut self) {
        let pending = self.products.pending_hint();
        if pending > 0 {
            debug!(pending, "Discarding unsaved changes");
        }
    }
}

/// Factory over a shared connection pool
#[derive(Clone)]
pub struct ProductUnitOfWorkFactory {
    db: DatabaseConnection,
}

impl ProductUnitOfWorkFactory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl UnitOfWorkFactory for ProductUnitOfWorkFactory {
    type Work = ProductUnitOfWork;

    fn begin(&self) -> ProductUnitOfWork {
        ProductUnitOfWork::new(self.db.clone())
    }
}
