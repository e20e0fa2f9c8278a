//! Backend abstraction for the flat row namespace.
//!
//! The storage engine talks to an abstract key-value backend so the engine
//! logic can run against `RocksDB` in production and an in-memory double in
//! tests. Backends provide per-row durability only; there is no cross-row
//! transaction.

use async_trait::async_trait;

use crate::keys::RowKey;
use crate::schema::AttrMap;

/// Maximum number of write operations a backend accepts per batch call.
///
/// Callers must chunk larger write sets; backends reject oversized batches.
pub const MAX_BATCH_OPS: usize = 25;

/// One stored row: its composite key plus its typed attributes.
///
/// The key parts are mirrored into the `PK`/`SK` attributes by the encoders
/// in [`crate::schema`], so a row read back from a query carries its own key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Composite row key.
    pub key: RowKey,
    /// Typed attributes, including `PK` and `SK`.
    pub attrs: AttrMap,
}

/// A single write operation inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert or fully replace a row.
    Put(Row),
    /// Remove a row by key. Removing an absent row is not an error.
    Delete(RowKey),
}

impl WriteOp {
    /// The key this operation acts on.
    #[must_use]
    pub fn key(&self) -> &RowKey {
        match self {
            Self::Put(row) => &row.key,
            Self::Delete(key) => key,
        }
    }
}

/// A backend transport or availability failure.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// Abstract key-value backend over the flat (primary, secondary) namespace.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Read one row by its exact key.
    async fn get_row(&self, table: &str, key: &RowKey) -> Result<Option<AttrMap>, BackendError>;

    /// Insert or fully replace one row. Single-row writes are atomic.
    async fn put_row(&self, table: &str, row: Row) -> Result<(), BackendError>;

    /// Remove one row by its exact key. Absent rows are not an error.
    async fn delete_row(&self, table: &str, key: &RowKey) -> Result<(), BackendError>;

    /// All rows whose primary key equals `primary`, ordered by secondary key.
    async fn query_primary(&self, table: &str, primary: &str)
        -> Result<Vec<AttrMap>, BackendError>;

    /// All rows whose primary key starts with `prefix`, in backend scan order.
    async fn scan_primary_prefix(
        &self,
        table: &str,
        prefix: &str,
    ) -> Result<Vec<AttrMap>, BackendError>;

    /// Apply up to [`MAX_BATCH_OPS`] write operations in one call.
    ///
    /// Returns the number of operations the backend did not apply. A nonzero
    /// count means the chunk partially failed; the backend does not say which
    /// operations were skipped.
    async fn batch_write(&self, table: &str, ops: &[WriteOp]) -> Result<usize, BackendError>;
}
