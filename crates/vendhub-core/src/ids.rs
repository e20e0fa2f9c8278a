//! Identifier types for vendhub.
//!
//! This module provides the strongly-typed machine identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A vending machine identifier (UUID format).
///
/// Machine IDs are generated once at machine creation and never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MachineId(uuid::Uuid);

impl MachineId {
    /// Create a new `MachineId` from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random `MachineId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl FromStr for MachineId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidMachineId)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MachineId({})", self.0)
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MachineId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MachineId> for String {
    fn from(id: MachineId) -> Self {
        id.0.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid machine ID.
    #[error("invalid machine ID format")]
    InvalidMachineId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_id_roundtrip() {
        let id = MachineId::generate();
        let str_repr = id.to_string();
        let parsed = MachineId::from_str(&str_repr).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn machine_id_serde_json() {
        let id = MachineId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: MachineId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn machine_id_rejects_garbage() {
        let result = MachineId::from_str("not-a-machine-id");
        assert_eq!(result, Err(IdError::InvalidMachineId));
    }

    #[test]
    fn machine_ids_are_unique() {
        let a = MachineId::generate();
        let b = MachineId::generate();
        assert_ne!(a, b);
    }
}
