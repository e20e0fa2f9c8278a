//! Attribute schema for stored rows.
//!
//! Rows carry an explicit, typed attribute map instead of an opaque
//! serialized document: every domain field maps to a named attribute of a
//! known type (string, number, or timestamp-as-string). Decoders ignore
//! attributes they do not know about, so extra or renamed fields written by
//! other tooling never leak into domain values.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendhub_core::{InventoryEntry, Machine, MachineId, RestockEntry};

use crate::backend::Row;
use crate::error::{Result, StoreError};
use crate::keys;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    /// String attribute.
    S(String),
    /// Integer attribute.
    N(i64),
}

/// Attribute map of one stored row, keyed by attribute name.
pub type AttrMap = BTreeMap<String, AttrValue>;

/// Attribute names used in stored rows.
pub mod attr {
    /// Primary (partition) part of the row key.
    pub const PK: &str = "PK";

    /// Secondary (sort) part of the row key.
    pub const SK: &str = "SK";

    /// Machine display name, or inventory item name.
    pub const NAME: &str = "Name";

    /// Inventory item price in pennies.
    pub const COST_PENNIES: &str = "CostPennies";

    /// Inventory item stock count.
    pub const QUANTITY: &str = "Quantity";

    /// Machine creation timestamp (RFC 3339 string).
    pub const CREATED_AT: &str = "CreatedAt";

    /// Inventory entry restock timestamp (RFC 3339 string).
    pub const RESTOCKED_AT: &str = "RestockedAt";
}

/// Encode a machine into its stored row. Inventory is not embedded; it lives
/// in separate rows.
#[must_use]
pub fn machine_row(machine: &Machine) -> Row {
    let key = keys::machine_key(&machine.id);
    let mut attrs = AttrMap::new();
    attrs.insert(attr::PK.into(), AttrValue::S(key.primary.clone()));
    attrs.insert(attr::SK.into(), AttrValue::S(key.secondary.clone()));
    attrs.insert(attr::NAME.into(), AttrValue::S(machine.name.clone()));
    attrs.insert(
        attr::CREATED_AT.into(),
        AttrValue::S(machine.created_at.to_rfc3339()),
    );
    Row { key, attrs }
}

/// Encode one desired inventory entry into its stored row.
#[must_use]
pub fn inventory_row(
    machine_id: &MachineId,
    entry: &RestockEntry,
    restocked_at: DateTime<Utc>,
) -> Row {
    let key = keys::inventory_key(machine_id, &entry.name);
    let mut attrs = AttrMap::new();
    attrs.insert(attr::PK.into(), AttrValue::S(key.primary.clone()));
    attrs.insert(attr::SK.into(), AttrValue::S(key.secondary.clone()));
    attrs.insert(attr::NAME.into(), AttrValue::S(entry.name.clone()));
    attrs.insert(
        attr::COST_PENNIES.into(),
        AttrValue::N(i64::from(entry.cost_pennies)),
    );
    attrs.insert(attr::QUANTITY.into(), AttrValue::N(i64::from(entry.quantity)));
    attrs.insert(
        attr::RESTOCKED_AT.into(),
        AttrValue::S(restocked_at.to_rfc3339()),
    );
    Row { key, attrs }
}

/// Decode a machine row. Unknown attributes are ignored.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if a required attribute is missing,
/// mistyped, or unparseable.
pub fn decode_machine(attrs: &AttrMap) -> Result<Machine> {
    let primary = get_s(attrs, attr::PK)?;
    let id_str = keys::machine_id_from_primary(primary)
        .ok_or_else(|| StoreError::Corrupt(format!("machine row with foreign PK: {primary}")))?;
    let id = MachineId::from_str(id_str)
        .map_err(|_| StoreError::Corrupt(format!("machine row with invalid ID: {id_str}")))?;

    Ok(Machine {
        id,
        name: get_s(attrs, attr::NAME)?.to_owned(),
        created_at: get_timestamp(attrs, attr::CREATED_AT)?,
        inventory: Vec::new(),
    })
}

/// Decode an inventory row. Unknown attributes are ignored.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if a required attribute is missing,
/// mistyped, or out of range.
pub fn decode_inventory_entry(attrs: &AttrMap) -> Result<InventoryEntry> {
    let primary = get_s(attrs, attr::PK)?;
    let id_str = keys::machine_id_from_inventory_primary(primary)
        .ok_or_else(|| StoreError::Corrupt(format!("inventory row with foreign PK: {primary}")))?;
    let machine_id = MachineId::from_str(id_str)
        .map_err(|_| StoreError::Corrupt(format!("inventory row with invalid machine ID: {id_str}")))?;

    Ok(InventoryEntry {
        machine_id,
        name: get_s(attrs, attr::NAME)?.to_owned(),
        cost_pennies: get_count(attrs, attr::COST_PENNIES)?,
        quantity: get_count(attrs, attr::QUANTITY)?,
        restocked_at: get_timestamp(attrs, attr::RESTOCKED_AT)?,
    })
}

/// Rebuild the row key from a row's own PK/SK attributes.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if either key attribute is missing or
/// mistyped.
pub fn row_key(attrs: &AttrMap) -> Result<crate::keys::RowKey> {
    Ok(crate::keys::RowKey {
        primary: get_s(attrs, attr::PK)?.to_owned(),
        secondary: get_s(attrs, attr::SK)?.to_owned(),
    })
}

fn get_s<'a>(attrs: &'a AttrMap, name: &str) -> Result<&'a str> {
    match attrs.get(name) {
        Some(AttrValue::S(s)) => Ok(s),
        Some(AttrValue::N(_)) => Err(StoreError::Corrupt(format!(
            "attribute {name} has number type, expected string"
        ))),
        None => Err(StoreError::Corrupt(format!("missing attribute {name}"))),
    }
}

fn get_n(attrs: &AttrMap, name: &str) -> Result<i64> {
    match attrs.get(name) {
        Some(AttrValue::N(n)) => Ok(*n),
        Some(AttrValue::S(_)) => Err(StoreError::Corrupt(format!(
            "attribute {name} has string type, expected number"
        ))),
        None => Err(StoreError::Corrupt(format!("missing attribute {name}"))),
    }
}

fn get_count(attrs: &AttrMap, name: &str) -> Result<u32> {
    let n = get_n(attrs, name)?;
    u32::try_from(n)
        .map_err(|_| StoreError::Corrupt(format!("attribute {name} out of range: {n}")))
}

fn get_timestamp(attrs: &AttrMap, name: &str) -> Result<DateTime<Utc>> {
    let s = get_s(attrs, name)?;
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("attribute {name} is not a timestamp: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_row_roundtrip() {
        let machine = Machine::new("Test Machine");
        let row = machine_row(&machine);

        assert_eq!(row.key.primary, format!("MAC#{}", machine.id));
        assert_eq!(row.key.primary, row.key.secondary);

        let decoded = decode_machine(&row.attrs).unwrap();
        assert_eq!(decoded.id, machine.id);
        assert_eq!(decoded.name, "Test Machine");
        assert_eq!(decoded.created_at, machine.created_at);
        assert!(decoded.inventory.is_empty());
    }

    #[test]
    fn inventory_row_roundtrip() {
        let machine_id = MachineId::generate();
        let now = Utc::now();
        let row = inventory_row(&machine_id, &RestockEntry::new("Soda", 150, 10), now);

        assert_eq!(row.key.primary, format!("INV#{machine_id}"));
        assert_eq!(row.key.secondary, "PROD#Soda");

        let decoded = decode_inventory_entry(&row.attrs).unwrap();
        assert_eq!(decoded.machine_id, machine_id);
        assert_eq!(decoded.name, "Soda");
        assert_eq!(decoded.cost_pennies, 150);
        assert_eq!(decoded.quantity, 10);
        assert_eq!(decoded.restocked_at, now);
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let machine = Machine::new("Test Machine");
        let mut row = machine_row(&machine);
        row.attrs.insert(
            "ExtraField".into(),
            AttrValue::S("Shouldn't bother anyone".into()),
        );

        let decoded = decode_machine(&row.attrs).unwrap();
        assert_eq!(decoded.name, "Test Machine");
    }

    #[test]
    fn missing_attribute_is_corrupt() {
        let machine = Machine::new("Test Machine");
        let mut row = machine_row(&machine);
        row.attrs.remove(attr::NAME);

        let result = decode_machine(&row.attrs);
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn negative_count_is_corrupt() {
        let machine_id = MachineId::generate();
        let mut row = inventory_row(&machine_id, &RestockEntry::new("Soda", 150, 10), Utc::now());
        row.attrs.insert(attr::QUANTITY.into(), AttrValue::N(-3));

        let result = decode_inventory_entry(&row.attrs);
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn mistyped_attribute_is_corrupt() {
        let machine = Machine::new("Test Machine");
        let mut row = machine_row(&machine);
        row.attrs.insert(attr::NAME.into(), AttrValue::N(7));

        let result = decode_machine(&row.attrs);
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }
}
