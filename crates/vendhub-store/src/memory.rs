//! In-memory backend for tests.
//!
//! Behaves like the real backend over a `BTreeMap`, and additionally records
//! every mutating call in order and lets tests plant an "unprocessed items"
//! result on a chosen batch call. That is what the engine's chunking and
//! partial-failure tests are built on.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::backend::{BackendError, KvBackend, Row, WriteOp, MAX_BATCH_OPS};
use crate::keys::RowKey;
use crate::schema::AttrMap;

/// One mutating backend call, as observed by tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A `put_row` call.
    PutRow(RowKey),
    /// A `delete_row` call.
    DeleteRow(RowKey),
    /// A `batch_write` call with the submitted operations.
    BatchWrite(Vec<WriteOp>),
}

#[derive(Default)]
struct Inner {
    tables: BTreeMap<String, BTreeMap<RowKey, AttrMap>>,
    log: Vec<Mutation>,
    batch_calls: usize,
    // 1-based batch call index -> unprocessed count to report. A planted
    // call applies none of its operations.
    planted_failures: HashMap<usize, usize>,
}

/// In-memory implementation of [`KvBackend`] for tests.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `call`-th `batch_write` (1-based, counted across the backend's
    /// lifetime) report `unprocessed` items and apply nothing.
    pub fn plant_batch_failure(&self, call: usize, unprocessed: usize) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.planted_failures.insert(call, unprocessed);
    }

    /// All mutating calls so far, in order.
    #[must_use]
    pub fn mutations(&self) -> Vec<Mutation> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .log
            .clone()
    }

    /// Sizes of the batch-write calls so far, in order.
    #[must_use]
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .log
            .iter()
            .filter_map(|m| match m {
                Mutation::BatchWrite(ops) => Some(ops.len()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get_row(&self, table: &str, key: &RowKey) -> Result<Option<AttrMap>, BackendError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .tables
            .get(table)
            .and_then(|rows| rows.get(key))
            .cloned())
    }

    async fn put_row(&self, table: &str, row: Row) -> Result<(), BackendError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.log.push(Mutation::PutRow(row.key.clone()));
        inner
            .tables
            .entry(table.to_owned())
            .or_default()
            .insert(row.key, row.attrs);
        Ok(())
    }

    async fn delete_row(&self, table: &str, key: &RowKey) -> Result<(), BackendError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.log.push(Mutation::DeleteRow(key.clone()));
        if let Some(rows) = inner.tables.get_mut(table) {
            rows.remove(key);
        }
        Ok(())
    }

    async fn query_primary(
        &self,
        table: &str,
        primary: &str,
    ) -> Result<Vec<AttrMap>, BackendError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|(key, _)| key.primary == primary)
                    .map(|(_, attrs)| attrs.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn scan_primary_prefix(
        &self,
        table: &str,
        prefix: &str,
    ) -> Result<Vec<AttrMap>, BackendError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|(key, _)| key.primary.starts_with(prefix))
                    .map(|(_, attrs)| attrs.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn batch_write(&self, table: &str, ops: &[WriteOp]) -> Result<usize, BackendError> {
        if ops.len() > MAX_BATCH_OPS {
            return Err(BackendError(format!(
                "batch of {} operations exceeds the maximum of {MAX_BATCH_OPS}",
                ops.len()
            )));
        }

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.batch_calls += 1;
        inner.log.push(Mutation::BatchWrite(ops.to_vec()));

        let call = inner.batch_calls;
        if let Some(unprocessed) = inner.planted_failures.get(&call).copied() {
            return Ok(unprocessed);
        }

        let rows = inner.tables.entry(table.to_owned()).or_default();
        for op in ops {
            match op {
                WriteOp::Put(row) => {
                    rows.insert(row.key.clone(), row.attrs.clone());
                }
                WriteOp::Delete(key) => {
                    rows.remove(key);
                }
            }
        }

        Ok(0)
    }
}
