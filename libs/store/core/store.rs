use std::sync::Arc;

use derive_more::Deref;

use super::{
    error::StoreResult,
    query::{Query, Table},
    record::Record,
};
use crate::PinFuture;

/// Shared handle over a store implementation. Cloning is cheap, so the
/// session and the board can each hold a handle to the same client.
#[derive(Clone, Deref)]
#[deref(forward)]
pub struct StoreBox(Arc<dyn Store>);

impl StoreBox {
    pub fn new(store: impl Store + 'static) -> Self {
        Self(Arc::new(store))
    }
}

/// The remote store contract: CRUD over the `Users` and `Tasks` tables,
/// filtered by equality predicates only. All operations are fallible and
/// asynchronous; failures are values, never panics.
pub trait Store: Send + Sync {
    /// All rows matching every filter of the query. With `single()` set the
    /// implementation enforces the exactly-one cardinality itself.
    fn select(&self, query: Query) -> PinFuture<StoreResult<Vec<Record>>>;

    /// Insert rows and return them with their store-assigned ids. Inserting
    /// a `Users` row with a taken username fails atomically with
    /// `StoreError::Conflict`.
    fn insert(&self, table: Table, rows: Vec<Record>) -> PinFuture<StoreResult<Vec<Record>>>;

    /// Apply a partial row to every matching row.
    fn update(&self, query: Query, patch: Record) -> PinFuture<StoreResult<()>>;

    /// Remove every matching row.
    fn delete(&self, query: Query) -> PinFuture<StoreResult<()>>;
}
