use async_trait::async_trait;
use database::{BaseRepository, DatabaseResult, Flushed, Repository};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, QueryFilter};
use tracing::debug;

use crate::entity::{self, Column, Entity};
use crate::models::{Product, ProductInput};

/// Product storage: the generic repository plus product-specific operations.
///
/// Writes are staged and only reach the store when the owning unit of work
/// saves.
#[async_trait]
pub trait ProductRepository: Repository<Product, i32, Draft = ProductInput> {
    /// Stage a full replace keyed by `product.id`; a missing row surfaces at save
    async fn update_product(&self, product: Product) -> DatabaseResult<()>;

    /// Products with `is_available = true`, in id order
    async fn get_available_products(&self) -> DatabaseResult<Vec<Product>>;
}

/// SeaORM-backed [`ProductRepository`]
pub struct PgProductRepository {
    base: BaseRepository<Entity, entity::ActiveModel>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Apply staged changes on `conn` (normally a transaction)
    pub async fn flush<C: ConnectionTrait>(&self, conn: &C) -> DatabaseResult<Flushed<Product>> {
        Ok(self.base.flush(conn).await?.map(Product::from))
    }

    pub fn pending_hint(&self) -> usize {
        self.base.changes().pending_hint()
    }
}

#[async_trait]
impl Repository<Product, i32> for PgProductRepository {
    type Draft = ProductInput;

    async fn get_by_id(&self, id: i32) -> DatabaseResult<Option<Product>> {
        Ok(self.base.get_by_id(id).await?.map(Product::from))
    }

    async fn get_all(&self) -> DatabaseResult<Vec<Product>> {
        let models = self.base.get_all().await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn get_many(&self, start: u64, count: u64) -> DatabaseResult<Vec<Product>> {
        let models = self.base.get_many(start, count).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn add(&self, input: ProductInput) -> DatabaseResult<()> {
        debug!(product_id = ?input.id, "Staging product insert");
        self.base.add(input.into()).await
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        self.base.delete(id).await
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn update_product(&self, product: Product) -> DatabaseResult<()> {
        debug!(product_id = product.id, "Staging product replace");
        self.base.stage_update(product.into()).await;
        Ok(())
    }

    async fn get_available_products(&self) -> DatabaseResult<Vec<Product>> {
        let models = BaseRepository::<Entity, entity::ActiveModel>::ordered()
            .filter(Column::IsAvailable.eq(true))
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }
}
