use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    Iterable, PrimaryKeyToColumn,
};
use tokio::sync::Mutex;
use tracing::debug;

/// A write waiting for the owning unit of work to commit
#[derive(Debug, Clone, PartialEq)]
pub enum StagedChange<A> {
    Insert(A),
    Update(A),
    Delete(A),
}

impl<A> StagedChange<A> {
    pub fn kind(&self) -> &'static str {
        match self {
            StagedChange::Insert(_) => "insert",
            StagedChange::Update(_) => "update",
            StagedChange::Delete(_) => "delete",
        }
    }
}

/// Outcome of a flush
#[derive(Debug, Clone, PartialEq)]
pub struct Flushed<M> {
    pub applied: usize,
    /// Rows written by staged inserts, as the store returned them, in staging order
    pub inserted: Vec<M>,
    /// At least one insert carried its own primary key
    pub explicit_keys: bool,
}

impl<M> Flushed<M> {
    pub fn empty() -> Self {
        Self {
            applied: 0,
            inserted: Vec::new(),
            explicit_keys: false,
        }
    }

    pub fn map<N>(self, f: impl FnMut(M) -> N) -> Flushed<N> {
        Flushed {
            applied: self.applied,
            inserted: self.inserted.into_iter().map(f).collect(),
            explicit_keys: self.explicit_keys,
        }
    }
}

/// Ordered set of staged writes.
///
/// Nothing reaches the store until [`ChangeSet::flush`] runs. A flush always
/// empties the set, whether or not every change applied.
#[derive(Debug)]
pub struct ChangeSet<A> {
    pending: Mutex<Vec<StagedChange<A>>>,
}

impl<A> ChangeSet<A> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
        }
    }

    pub async fn stage(&self, change: StagedChange<A>) {
        debug!(kind = change.kind(), "Staging change");
        self.pending.lock().await.push(change);
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }

    /// Drain the staged changes in staging order
    pub async fn take(&self) -> Vec<StagedChange<A>> {
        std::mem::take(&mut *self.pending.lock().await)
    }

    /// Drop every staged change, returning how many were dropped
    pub async fn discard(&self) -> usize {
        self.take().await.len()
    }

    /// Pending count without waiting on the lock; 0 while another task holds it.
    /// Meant for `Drop` impls.
    pub fn pending_hint(&self) -> usize {
        self.pending.try_lock().map(|pending| pending.len()).unwrap_or(0)
    }
}

impl<A> Default for ChangeSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ChangeSet<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    /// Apply the staged changes on `conn`, in order.
    ///
    /// Called with a transaction by the unit of work, so a failure part-way
    /// leaves nothing behind once the transaction is dropped.
    pub async fn flush<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Flushed<<A::Entity as EntityTrait>::Model>, DbErr> {
        let changes = self.take().await;
        let mut flushed = Flushed::empty();
        flushed.applied = changes.len();

        for change in changes {
            match change {
                StagedChange::Insert(model) => {
                    flushed.explicit_keys |= sets_primary_key(&model);
                    flushed.inserted.push(model.insert(conn).await?);
                }
                StagedChange::Update(model) => {
                    model.update(conn).await?;
                }
                StagedChange::Delete(model) => {
                    model.delete(conn).await?;
                }
            }
        }

        debug!(applied = flushed.applied, "Flushed staged changes");
        Ok(flushed)
    }
}

/// Whether `model` carries a value for any primary-key column
pub(crate) fn sets_primary_key<A: ActiveModelTrait>(model: &A) -> bool {
    <<A::Entity as EntityTrait>::PrimaryKey as Iterable>::iter()
        .any(|key| model.get(key.into_column()).is_set())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_changes_keep_staging_order() {
        let changes = ChangeSet::new();
        changes.stage(StagedChange::Insert("a")).await;
        changes.stage(StagedChange::Update("b")).await;
        changes.stage(StagedChange::Delete("a")).await;

        assert_eq!(changes.len().await, 3);
        assert_eq!(
            changes.take().await,
            vec![
                StagedChange::Insert("a"),
                StagedChange::Update("b"),
                StagedChange::Delete("a"),
            ]
        );
        assert!(changes.is_empty().await);
    }

    #[tokio::test]
    async fn test_discard_empties_the_set() {
        let changes = ChangeSet::new();
        changes.stage(StagedChange::Insert(1)).await;
        changes.stage(StagedChange::Insert(2)).await;

        assert_eq!(changes.pending_hint(), 2);
        assert_eq!(changes.discard().await, 2);
        assert_eq!(changes.pending_hint(), 0);
    }

    #[test]
    fn test_flushed_map_keeps_counts() {
        let flushed = Flushed {
            applied: 3,
            inserted: vec![1, 2],
            explicit_keys: true,
        };

        let mapped = flushed.map(|n| n * 10);

        assert_eq!(mapped.applied, 3);
        assert_eq!(mapped.inserted, vec![10, 20]);
        assert!(mapped.explicit_keys);
    }

    #[test]
    fn test_change_kind() {
        assert_eq!(StagedChange::Insert(()).kind(), "insert");
        assert_eq!(StagedChange::Update(()).kind(), "update");
        assert_eq!(StagedChange::Delete(()).kind(), "delete");
    }
}
