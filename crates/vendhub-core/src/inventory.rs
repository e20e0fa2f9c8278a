//! Inventory types for vendhub.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MachineId;

/// A stored inventory line item belonging to one machine.
///
/// The item name is unique within a machine's inventory and acts as the
/// entry's identity there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// The owning machine.
    pub machine_id: MachineId,

    /// Item name, unique within the machine.
    pub name: String,

    /// Price per unit in pennies.
    pub cost_pennies: u32,

    /// Units currently stocked.
    pub quantity: u32,

    /// When this entry was last written by a restock.
    pub restocked_at: DateTime<Utc>,
}

/// A desired inventory line item supplied to a restock.
///
/// Restocking reconciles the machine's stored inventory against the full
/// desired set: every entry here is upserted, and stored items not named
/// here are removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockEntry {
    /// Item name, unique within the machine.
    pub name: String,

    /// Price per unit in pennies.
    pub cost_pennies: u32,

    /// Target stock count.
    pub quantity: u32,
}

impl RestockEntry {
    /// Create a desired entry.
    #[must_use]
    pub fn new(name: impl Into<String>, cost_pennies: u32, quantity: u32) -> Self {
        Self {
            name: name.into(),
            cost_pennies,
            quantity,
        }
    }
}
