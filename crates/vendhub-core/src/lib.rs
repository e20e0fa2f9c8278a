//! Core types for vendhub.
//!
//! This crate provides the foundational types used throughout the vendhub
//! service:
//!
//! - **Identifiers**: `MachineId`
//! - **Machines**: `Machine`
//! - **Inventory**: `InventoryEntry`, `RestockEntry`
//!
//! Prices are stored as `u32` integer pennies to avoid floating point
//! precision issues; stock counts are non-negative by construction.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod inventory;
pub mod machine;

pub use ids::{IdError, MachineId};
pub use inventory::{InventoryEntry, RestockEntry};
pub use machine::Machine;
