use serde::{Deserialize, Serialize};

use crate::{EquipmentId, Position, StateEvent};

/// Resolved current view of one equipment: its latest position joined with
/// its latest state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSnapshot {
    pub equipment_id: EquipmentId,
    pub name: String,
    pub position: Position,
    pub timestamp: String,
    pub state_name: String,
    pub state_color: String,
    pub state_history: Vec<StateEvent>,
}
