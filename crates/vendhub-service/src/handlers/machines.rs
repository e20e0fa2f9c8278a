//! Machine management handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use vendhub_core::{InventoryEntry, Machine, MachineId, RestockEntry};

use crate::error::ApiError;
use crate::state::AppState;

/// Machine summary, as returned by the list endpoint.
#[derive(Debug, Serialize)]
pub struct MachineSummary {
    /// Machine ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<&Machine> for MachineSummary {
    fn from(machine: &Machine) -> Self {
        Self {
            id: machine.id.to_string(),
            name: machine.name.clone(),
            created_at: machine.created_at.to_rfc3339(),
        }
    }
}

/// Machine detail, including its full inventory.
#[derive(Debug, Serialize)]
pub struct MachineResponse {
    /// Machine ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Inventory line items.
    pub inventory: Vec<InventoryEntryResponse>,
}

impl From<&Machine> for MachineResponse {
    fn from(machine: &Machine) -> Self {
        Self {
            id: machine.id.to_string(),
            name: machine.name.clone(),
            created_at: machine.created_at.to_rfc3339(),
            inventory: machine.inventory.iter().map(Into::into).collect(),
        }
    }
}

/// One inventory line item.
#[derive(Debug, Serialize)]
pub struct InventoryEntryResponse {
    /// Item name.
    pub name: String,
    /// Price per unit in pennies.
    pub cost_pennies: u32,
    /// Units currently stocked.
    pub quantity: u32,
    /// When this entry was last restocked.
    pub restocked_at: String,
}

impl From<&InventoryEntry> for InventoryEntryResponse {
    fn from(entry: &InventoryEntry) -> Self {
        Self {
            name: entry.name.clone(),
            cost_pennies: entry.cost_pennies,
            quantity: entry.quantity,
            restocked_at: entry.restocked_at.to_rfc3339(),
        }
    }
}

/// Create machine request.
#[derive(Debug, Deserialize)]
pub struct CreateMachineRequest {
    /// Display name for the new machine.
    pub name: String,
}

/// Create machine response.
#[derive(Debug, Serialize)]
pub struct CreateMachineResponse {
    /// ID of the created machine.
    pub id: String,
}

/// Restock request: the complete desired inventory for the machine.
///
/// Items are optional at the wire level so a JSON `null` element can be
/// rejected with a clear 400 instead of a generic parse failure.
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    /// Desired inventory line items.
    pub items: Vec<Option<RestockItem>>,
}

/// One desired inventory line item.
#[derive(Debug, Deserialize)]
pub struct RestockItem {
    /// Item name.
    pub name: String,
    /// Price per unit in pennies.
    pub cost_pennies: u32,
    /// Target stock count.
    pub quantity: u32,
}

/// Restock response: the inventory as it was before the restock.
#[derive(Debug, Serialize)]
pub struct RestockResponse {
    /// Snapshot of the inventory before the writes.
    pub previous_inventory: Vec<InventoryEntryResponse>,
}

/// Create a new machine.
pub async fn create_machine(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateMachineRequest>,
) -> Result<Json<CreateMachineResponse>, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("machine name must not be empty".into()));
    }

    let id = state.store.create_machine(&body.name).await?;

    tracing::info!(machine_id = %id, "Machine created");

    Ok(Json(CreateMachineResponse { id: id.to_string() }))
}

/// List all machines (without inventory).
pub async fn list_machines(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MachineSummary>>, ApiError> {
    let machines = state.store.list_machines().await?;
    Ok(Json(machines.iter().map(Into::into).collect()))
}

/// Get one machine with its full inventory.
pub async fn get_machine(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MachineResponse>, ApiError> {
    let id = parse_machine_id(&id)?;

    let machine = state
        .store
        .get_machine(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("machine not found: {id}")))?;

    Ok(Json(MachineResponse::from(&machine)))
}

/// Delete a machine and all of its inventory.
pub async fn delete_machine(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_machine_id(&id)?;

    state.store.delete_machine(&id).await?;

    tracing::info!(machine_id = %id, "Machine deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Replace a machine's inventory with the desired set.
pub async fn restock_machine(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RestockRequest>,
) -> Result<Json<RestockResponse>, ApiError> {
    let id = parse_machine_id(&id)?;

    let mut desired = Vec::with_capacity(body.items.len());
    for item in body.items {
        let Some(item) = item else {
            return Err(ApiError::BadRequest(
                "restock items must not contain null entries".into(),
            ));
        };
        desired.push(RestockEntry::new(item.name, item.cost_pennies, item.quantity));
    }

    let previous = state.store.restock_machine(&id, &desired).await?;

    tracing::info!(machine_id = %id, items = desired.len(), "Machine restocked");

    Ok(Json(RestockResponse {
        previous_inventory: previous.iter().map(Into::into).collect(),
    }))
}

fn parse_machine_id(raw: &str) -> Result<MachineId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid machine ID: {raw}")))
}
