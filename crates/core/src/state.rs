use serde::{Deserialize, Serialize};

use crate::{EquipmentId, StateId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StateEvent {
    pub equipment_state_id: StateId,
    pub timestamp: String,
}

/// State changes recorded for one equipment, in the order the fixture lists
/// them. The last entry is the current state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StateHistory {
    pub equipment_id: EquipmentId,
    pub states: Vec<StateEvent>,
}

impl StateHistory {
    pub fn latest(&self) -> Option<&StateEvent> {
        self.states.last()
    }
}

/// Catalog entry: display name and hex color of an operational state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateDefinition {
    pub id: StateId,
    pub name: String,
    pub color: String,
}
