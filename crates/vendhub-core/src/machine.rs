//! Machine types for vendhub.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{InventoryEntry, MachineId};

/// A vending machine.
///
/// The machine row itself is immutable after creation; inventory changes
/// never touch it. Inventory lives in separate rows owned by the machine
/// and is only populated on a detail read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine identifier, assigned at creation.
    pub id: MachineId,

    /// Display name of the machine.
    pub name: String,

    /// When the machine was created. Set once, immutable thereafter.
    pub created_at: DateTime<Utc>,

    /// Inventory line items. Empty in list results; filled by detail reads.
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
}

impl Machine {
    /// Create a new machine with a fresh ID, the current timestamp, and no
    /// inventory.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MachineId::generate(),
            name: name.into(),
            created_at: Utc::now(),
            inventory: Vec::new(),
        }
    }

    /// Look up an inventory entry by item name (case-sensitive).
    #[must_use]
    pub fn entry(&self, item_name: &str) -> Option<&InventoryEntry> {
        self.inventory.iter().find(|e| e.name == item_name)
    }
}
