//! The storage and reconciliation engine.
//!
//! `InventoryStore` is a stateless façade over an injected backend client:
//! it holds no mutable state of its own and is safe to share across
//! concurrent requests without coordination. Multi-row mutations (the delete
//! cascade and restock reconciliation) run as chunked, non-transactional
//! batch writes; the ordering and failure rules live here.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use vendhub_core::{InventoryEntry, Machine, MachineId, RestockEntry};

use crate::backend::{BackendError, KvBackend, WriteOp, MAX_BATCH_OPS};
use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema;

/// Storage engine for machines and their inventories.
pub struct InventoryStore {
    backend: Arc<dyn KvBackend>,
    table: String,
}

impl InventoryStore {
    /// Create a store over the given backend client and table.
    ///
    /// Both are immutable for the lifetime of the store.
    #[must_use]
    pub fn new(backend: Arc<dyn KvBackend>, table: impl Into<String>) -> Self {
        Self {
            backend,
            table: table.into(),
        }
    }

    /// Create a machine with a fresh ID and the current timestamp.
    ///
    /// Writes a single row, which is atomic at the backend; a machine is
    /// never partially created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the write fails.
    pub async fn create_machine(&self, name: &str) -> Result<MachineId> {
        let machine = Machine::new(name);
        let row = schema::machine_row(&machine);

        self.backend
            .put_row(&self.table, row)
            .await
            .map_err(|e| backend_err("create_machine", e))?;

        tracing::debug!(machine_id = %machine.id, name = %machine.name, "machine created");
        Ok(machine.id)
    }

    /// List every machine, in backend scan order.
    ///
    /// Callers must not rely on ordering. Inventory is not loaded; each
    /// machine comes back with an empty inventory list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the scan fails, or
    /// [`StoreError::Corrupt`] if a machine row cannot be decoded.
    pub async fn list_machines(&self) -> Result<Vec<Machine>> {
        let rows = self
            .backend
            .scan_primary_prefix(&self.table, keys::MACHINE_PREFIX)
            .await
            .map_err(|e| backend_err("list_machines", e))?;

        rows.iter().map(schema::decode_machine).collect()
    }

    /// Read one machine together with its full inventory.
    ///
    /// Returns `Ok(None)` if no machine row exists; an absent machine is a
    /// valid outcome here, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if either read fails, or
    /// [`StoreError::Corrupt`] if a row cannot be decoded.
    pub async fn get_machine(&self, id: &MachineId) -> Result<Option<Machine>> {
        self.read_machine_with_inventory(id, "get_machine").await
    }

    /// Delete a machine and all of its inventory rows.
    ///
    /// Two phases: the inventory rows are batch-deleted first, then the
    /// machine row. If the inventory phase fails the machine row is left
    /// untouched and the whole operation fails, so readers never observe a
    /// deleted machine with live inventory rows. The inventory phase itself
    /// is chunked and non-transactional: a failure partway through leaves
    /// earlier chunks deleted.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if no machine row exists.
    /// - [`StoreError::Backend`] on a transport failure.
    /// - [`StoreError::Unprocessed`] if a delete chunk partially failed.
    pub async fn delete_machine(&self, id: &MachineId) -> Result<()> {
        let machine_key = keys::machine_key(id);

        let machine_attrs = self
            .backend
            .get_row(&self.table, &machine_key)
            .await
            .map_err(|e| backend_err("delete_machine", e))?;
        if machine_attrs.is_none() {
            return Err(StoreError::NotFound {
                machine_id: id.to_string(),
            });
        }

        let inventory_rows = self
            .backend
            .query_primary(&self.table, &keys::inventory_primary(id))
            .await
            .map_err(|e| backend_err("delete_machine", e))?;

        let deletes = inventory_rows
            .iter()
            .map(|attrs| Ok(WriteOp::Delete(schema::row_key(attrs)?)))
            .collect::<Result<Vec<_>>>()?;
        let inventory_count = deletes.len();

        self.write_chunked("delete_machine", deletes).await?;

        // Only now is the machine row allowed to disappear.
        self.backend
            .delete_row(&self.table, &machine_key)
            .await
            .map_err(|e| backend_err("delete_machine", e))?;

        tracing::debug!(machine_id = %id, inventory_count, "machine deleted");
        Ok(())
    }

    /// Reconcile a machine's stored inventory against the desired set.
    ///
    /// Every desired entry is upserted with a fresh restock timestamp, and
    /// every stored item whose name (case-sensitive) is absent from the
    /// desired set is deleted. All writes go out as one logical batch list,
    /// chunked; upserts and deletes act on disjoint keys so their relative
    /// order within a chunk does not matter.
    ///
    /// Returns the inventory snapshot read *before* the writes, letting
    /// callers diff old against new without a second read.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] for a desired entry with an empty
    ///   item name, before anything is written.
    /// - [`StoreError::NotFound`] if no machine row exists.
    /// - [`StoreError::Backend`] on a transport failure.
    /// - [`StoreError::Unprocessed`] if a chunk partially failed. The
    ///   inventory may then be partially reconciled; earlier chunks stay
    ///   committed and nothing is retried.
    pub async fn restock_machine(
        &self,
        id: &MachineId,
        desired: &[RestockEntry],
    ) -> Result<Vec<InventoryEntry>> {
        for entry in desired {
            if entry.name.is_empty() {
                return Err(StoreError::InvalidArgument(
                    "desired inventory entry has an empty item name".into(),
                ));
            }
        }

        let Some(machine) = self.read_machine_with_inventory(id, "restock_machine").await? else {
            return Err(StoreError::NotFound {
                machine_id: id.to_string(),
            });
        };
        let previous = machine.inventory;

        let now = Utc::now();
        let desired_names: HashSet<&str> = desired.iter().map(|e| e.name.as_str()).collect();

        let mut ops: Vec<WriteOp> = desired
            .iter()
            .map(|entry| WriteOp::Put(schema::inventory_row(id, entry, now)))
            .collect();
        ops.extend(
            previous
                .iter()
                .filter(|entry| !desired_names.contains(entry.name.as_str()))
                .map(|entry| WriteOp::Delete(keys::inventory_key(id, &entry.name))),
        );

        tracing::debug!(
            machine_id = %id,
            upserts = desired.len(),
            deletes = ops.len() - desired.len(),
            "restocking machine"
        );

        self.write_chunked("restock_machine", ops).await?;
        Ok(previous)
    }

    /// Read the machine row and its inventory range concurrently.
    ///
    /// The two reads touch disjoint key ranges, so issuing them together is
    /// safe; both are started before either is awaited.
    async fn read_machine_with_inventory(
        &self,
        id: &MachineId,
        operation: &'static str,
    ) -> Result<Option<Machine>> {
        let machine_key = keys::machine_key(id);
        let inventory_primary = keys::inventory_primary(id);

        let machine_fut = self.backend.get_row(&self.table, &machine_key);
        let inventory_fut = self.backend.query_primary(&self.table, &inventory_primary);

        let (machine_attrs, inventory_rows) = futures::try_join!(machine_fut, inventory_fut)
            .map_err(|e| backend_err(operation, e))?;

        let Some(attrs) = machine_attrs else {
            return Ok(None);
        };

        let mut machine = schema::decode_machine(&attrs)?;
        machine.inventory = inventory_rows
            .iter()
            .map(schema::decode_inventory_entry)
            .collect::<Result<_>>()?;

        Ok(Some(machine))
    }

    /// Flush write operations in chunks of at most [`MAX_BATCH_OPS`].
    ///
    /// Fails the whole operation as soon as a chunk reports unprocessed
    /// items; later chunks are never sent, earlier chunks stay committed.
    async fn write_chunked(&self, operation: &'static str, ops: Vec<WriteOp>) -> Result<()> {
        for chunk in ops.chunks(MAX_BATCH_OPS) {
            let unprocessed = self
                .backend
                .batch_write(&self.table, chunk)
                .await
                .map_err(|e| backend_err(operation, e))?;

            if unprocessed > 0 {
                return Err(StoreError::Unprocessed {
                    operation,
                    count: unprocessed,
                });
            }
        }
        Ok(())
    }
}

fn backend_err(operation: &'static str, err: BackendError) -> StoreError {
    StoreError::Backend {
        operation,
        message: err.0,
    }
}
