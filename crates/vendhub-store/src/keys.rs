//! Key encoding for the single-table layout.
//!
//! Pure, stateless mapping from machine IDs and item names to the two-part
//! row keys described in the crate docs. Inputs are trusted non-empty
//! strings; validation happens upstream.

use vendhub_core::MachineId;

/// Primary-key prefix shared by all machine rows.
pub const MACHINE_PREFIX: &str = "MAC#";

/// Primary-key prefix shared by all inventory rows.
pub const INVENTORY_PREFIX: &str = "INV#";

/// Secondary-key prefix shared by all inventory rows.
pub const PRODUCT_PREFIX: &str = "PROD#";

/// A two-part composite key identifying one row in the flat namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    /// Partition part of the key.
    pub primary: String,
    /// Sort part of the key.
    pub secondary: String,
}

/// Key of a machine row. Both parts are `MAC#<id>`.
#[must_use]
pub fn machine_key(id: &MachineId) -> RowKey {
    let part = format!("{MACHINE_PREFIX}{id}");
    RowKey {
        primary: part.clone(),
        secondary: part,
    }
}

/// Key of one inventory row: `(INV#<machine_id>, PROD#<item_name>)`.
#[must_use]
pub fn inventory_key(machine_id: &MachineId, item_name: &str) -> RowKey {
    RowKey {
        primary: inventory_primary(machine_id),
        secondary: format!("{PRODUCT_PREFIX}{item_name}"),
    }
}

/// Primary key shared by every inventory row of one machine; querying it
/// returns the machine's whole inventory.
#[must_use]
pub fn inventory_primary(machine_id: &MachineId) -> String {
    format!("{INVENTORY_PREFIX}{machine_id}")
}

/// Extract the machine ID string from a machine-row primary key.
#[must_use]
pub fn machine_id_from_primary(primary: &str) -> Option<&str> {
    primary.strip_prefix(MACHINE_PREFIX)
}

/// Extract the machine ID string from an inventory-row primary key.
#[must_use]
pub fn machine_id_from_inventory_primary(primary: &str) -> Option<&str> {
    primary.strip_prefix(INVENTORY_PREFIX)
}

/// Extract the item name from an inventory-row secondary key.
#[must_use]
pub fn item_name_from_secondary(secondary: &str) -> Option<&str> {
    secondary.strip_prefix(PRODUCT_PREFIX)
}
