//! Single-table storage layer for vendhub.
//!
//! This crate stores machines and their inventory line items in one flat
//! namespace of rows keyed by a (primary, secondary) string pair:
//!
//! - Machines: `PK = SK = "MAC#" + id`
//! - Inventory: `PK = "INV#" + machine_id`, `SK = "PROD#" + item_name`
//!
//! A range query over `INV#<id>` returns a machine's whole inventory and a
//! prefix scan over `MAC#` returns every machine. No two rows can collide on
//! (PK, SK), so item names are unique per machine by construction.
//!
//! Writes that touch many rows (delete cascade, restock reconciliation) go
//! through chunked batch writes of at most [`MAX_BATCH_OPS`] operations per
//! backend call. There is no cross-item transaction: a failed chunk leaves
//! prior chunks committed, and the failure is surfaced as
//! [`StoreError::Unprocessed`] without retrying.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vendhub_store::{InventoryStore, RocksBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = RocksBackend::open("/tmp/vendhub-db", &["vendhub"])
//!     .map(Arc::new)?;
//! let store = InventoryStore::new(backend, "vendhub");
//!
//! let id = store.create_machine("Snack Hub").await?;
//! let machine = store.get_machine(&id).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod error;
pub mod keys;
pub mod memory;
pub mod rocks;
pub mod schema;
pub mod store;

pub use backend::{BackendError, KvBackend, Row, WriteOp, MAX_BATCH_OPS};
pub use error::{Result, StoreError};
pub use keys::RowKey;
pub use memory::MemoryBackend;
pub use rocks::RocksBackend;
pub use store::InventoryStore;
