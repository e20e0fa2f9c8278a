//! `RocksDB` backend implementation.
//!
//! Each logical table maps to one column family. Inside a column family a
//! row is stored under `primary || 0x00 || secondary` with a CBOR-encoded
//! attribute map as the value. Row keys are ID strings and item names, which
//! never contain a NUL byte, so the separator is unambiguous and rows sort
//! by (primary, secondary).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use crate::backend::{BackendError, KvBackend, Row, WriteOp, MAX_BATCH_OPS};
use crate::keys::RowKey;
use crate::schema::AttrMap;

const KEY_SEPARATOR: u8 = 0;

/// `RocksDB`-backed implementation of [`KvBackend`].
pub struct RocksBackend {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksBackend {
    /// Open or create a `RocksDB` database at the given path with one column
    /// family per table name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P, tables: &[&str]) -> Result<Self, BackendError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = tables
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| BackendError(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>, BackendError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| BackendError(format!("unknown table: {name}")))
    }

    fn encode_key(key: &RowKey) -> Vec<u8> {
        let mut out = Vec::with_capacity(key.primary.len() + 1 + key.secondary.len());
        out.extend_from_slice(key.primary.as_bytes());
        out.push(KEY_SEPARATOR);
        out.extend_from_slice(key.secondary.as_bytes());
        out
    }

    fn serialize(attrs: &AttrMap) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        ciborium::into_writer(attrs, &mut buf).map_err(|e| BackendError(e.to_string()))?;
        Ok(buf)
    }

    fn deserialize(data: &[u8]) -> Result<AttrMap, BackendError> {
        ciborium::from_reader(data).map_err(|e| BackendError(e.to_string()))
    }

    /// Collect the values of all rows whose encoded key starts with `prefix`.
    fn collect_prefix(
        &self,
        cf: &Arc<BoundColumnFamily<'_>>,
        prefix: &[u8],
    ) -> Result<Vec<AttrMap>, BackendError> {
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));

        let mut rows = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| BackendError(e.to_string()))?;

            if !key.starts_with(prefix) {
                break;
            }

            rows.push(Self::deserialize(&value)?);
        }

        Ok(rows)
    }
}

#[async_trait]
impl KvBackend for RocksBackend {
    async fn get_row(&self, table: &str, key: &RowKey) -> Result<Option<AttrMap>, BackendError> {
        let cf = self.cf(table)?;

        self.db
            .get_cf(&cf, Self::encode_key(key))
            .map_err(|e| BackendError(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    async fn put_row(&self, table: &str, row: Row) -> Result<(), BackendError> {
        let cf = self.cf(table)?;
        let value = Self::serialize(&row.attrs)?;

        self.db
            .put_cf(&cf, Self::encode_key(&row.key), value)
            .map_err(|e| BackendError(e.to_string()))
    }

    async fn delete_row(&self, table: &str, key: &RowKey) -> Result<(), BackendError> {
        let cf = self.cf(table)?;

        self.db
            .delete_cf(&cf, Self::encode_key(key))
            .map_err(|e| BackendError(e.to_string()))
    }

    async fn query_primary(
        &self,
        table: &str,
        primary: &str,
    ) -> Result<Vec<AttrMap>, BackendError> {
        let cf = self.cf(table)?;

        // Exact primary match: include the separator so "INV#1" does not
        // also match "INV#12".
        let mut prefix = primary.as_bytes().to_vec();
        prefix.push(KEY_SEPARATOR);

        self.collect_prefix(&cf, &prefix)
    }

    async fn scan_primary_prefix(
        &self,
        table: &str,
        prefix: &str,
    ) -> Result<Vec<AttrMap>, BackendError> {
        let cf = self.cf(table)?;
        self.collect_prefix(&cf, prefix.as_bytes())
    }

    async fn batch_write(&self, table: &str, ops: &[WriteOp]) -> Result<usize, BackendError> {
        if ops.len() > MAX_BATCH_OPS {
            return Err(BackendError(format!(
                "batch of {} operations exceeds the maximum of {MAX_BATCH_OPS}",
                ops.len()
            )));
        }

        let cf = self.cf(table)?;

        let mut batch = WriteBatch::default();
        for op in ops {
            match op {
                WriteOp::Put(row) => {
                    batch.put_cf(&cf, Self::encode_key(&row.key), Self::serialize(&row.attrs)?);
                }
                WriteOp::Delete(key) => {
                    batch.delete_cf(&cf, Self::encode_key(key));
                }
            }
        }

        self.db
            .write(batch)
            .map_err(|e| BackendError(e.to_string()))?;

        // A committed RocksDB write batch applies in full.
        Ok(0)
    }
}
