//! Generic repository over SeaORM entities.
//!
//! ```text
//! ┌──────────────────────┐
//! │   Repository<T, K>   │  reads hit the store, writes are staged
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐     ┌───────────────┐
//! │ BaseRepository<E, A> │────▶│ ChangeSet<A>  │──▶ flush(txn) on commit
//! └──────────────────────┘     └───────────────┘
//! ```
//!
//! Reads never observe staged changes. Results come back ordered by primary
//! key ascending.

mod change_set;

pub use change_set::{ChangeSet, Flushed, StagedChange};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityName, EntityTrait, IdenStatic, IntoActiveModel, Iterable, PrimaryKeyToColumn,
    PrimaryKeyTrait, QueryOrder, QuerySelect, Select,
};
use std::marker::PhantomData;
use tracing::debug;

use crate::common::DatabaseResult;

/// Anything stored through a [`Repository`] exposes its identifier.
pub trait Identifiable {
    type Id;

    fn id(&self) -> Self::Id;
}

/// Store-agnostic CRUD surface for entities of type `T` keyed by `K`.
#[async_trait]
pub trait Repository<T, K>: Send + Sync
where
    T: Identifiable<Id = K> + Send + 'static,
    K: Send + 'static,
{
    /// Insertable form of `T`; lets the store assign identifiers left unset
    type Draft: Send + 'static;

    async fn get_by_id(&self, id: K) -> DatabaseResult<Option<T>>;

    async fn get_all(&self) -> DatabaseResult<Vec<T>>;

    /// Skip `start` rows, then take at most `count`
    async fn get_many(&self, start: u64, count: u64) -> DatabaseResult<Vec<T>>;

    /// Stage an insert
    async fn add(&self, entity: Self::Draft) -> DatabaseResult<()>;

    /// Stage a removal if `id` exists; a missing row is a no-op.
    ///
    /// Returns whether anything was staged.
    async fn delete(&self, id: K) -> DatabaseResult<bool>;
}

/// [`Repository`] implementation for a SeaORM entity `E` with active model `A`.
///
/// Each instance owns its own [`ChangeSet`]; one instance per unit of work.
pub struct BaseRepository<E, A> {
    db: DatabaseConnection,
    changes: ChangeSet<A>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, A> BaseRepository<E, A>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A> + Sync,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync + 'static,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            changes: ChangeSet::new(),
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn changes(&self) -> &ChangeSet<A> {
        &self.changes
    }

    /// `SELECT` over `E` in primary-key order, for custom filters
    pub fn ordered() -> Select<E> {
        <E::PrimaryKey as Iterable>::iter()
            .fold(E::find(), |query, key| query.order_by_asc(key.into_column()))
    }

    pub async fn stage_update(&self, model: A) {
        self.changes.stage(StagedChange::Update(model)).await;
    }

    /// Apply every staged change on `conn`.
    ///
    /// On PostgreSQL, inserts that supplied their own key leave the serial
    /// sequence behind; it is moved past them in the same transaction.
    pub async fn flush<C: ConnectionTrait>(&self, conn: &C) -> DatabaseResult<Flushed<E::Model>> {
        let flushed = self.changes.flush(conn).await?;

        if flushed.explicit_keys && conn.get_database_backend() == DbBackend::Postgres {
            if let Some(sql) = Self::key_sequence_sync() {
                debug!(table = E::default().table_name(), "Advancing key sequence");
                conn.execute_unprepared(&sql).await?;
            }
        }

        Ok(flushed)
    }

    /// `setval` moving the key sequence to at least the largest stored key.
    /// `None` unless the primary key is a single auto-increment column.
    fn key_sequence_sync() -> Option<String> {
        if !<E::PrimaryKey as PrimaryKeyTrait>::auto_increment() {
            return None;
        }

        let mut keys = <E::PrimaryKey as Iterable>::iter();
        let column = keys.next()?.into_column();
        if keys.next().is_some() {
            return None;
        }

        let table = E::default().table_name();
        let column = column.as_str();
        let sequence = format!("pg_get_serial_sequence('{table}', '{column}')");

        Some(format!(
            r#"SELECT setval({sequence}, GREATEST((SELECT MAX("{column}") FROM "{table}"), nextval({sequence})))"#
        ))
    }
}

#[async_trait]
impl<E, A, K> Repository<E::Model, K> for BaseRepository<E, A>
where
    E: EntityTrait,
    E::Model: Identifiable<Id = K> + IntoActiveModel<A> + Sync + 'static,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync + 'static,
    K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> + Send + 'static,
{
    type Draft = A;

    async fn get_by_id(&self, id: K) -> DatabaseResult<Option<E::Model>> {
        Ok(E::find_by_id(id).one(&self.db).await?)
    }

    async fn get_all(&self) -> DatabaseResult<Vec<E::Model>> {
        Ok(Self::ordered().all(&self.db).await?)
    }

    async fn get_many(&self, start: u64, count: u64) -> DatabaseResult<Vec<E::Model>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        Ok(Self::ordered()
            .offset(start)
            .limit(count)
            .all(&self.db)
            .await?)
    }

    async fn add(&self, entity: A) -> DatabaseResult<()> {
        self.changes.stage(StagedChange::Insert(entity)).await;
        Ok(())
    }

    async fn delete(&self, id: K) -> DatabaseResult<bool> {
        match E::find_by_id(id).one(&self.db).await? {
            Some(model) => {
                self.changes
                    .stage(StagedChange::Delete(model.into_active_model()))
                    .await;
                Ok(true)
            }
            None => {
                debug!("Delete requested for a missing row, nothing staged");
                Ok(false)
            }
        }
    }
}
