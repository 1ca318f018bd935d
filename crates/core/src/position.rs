use serde::{Deserialize, Serialize};

use crate::{EquipmentId, Position};

/// One observed position of a piece of equipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub equipment_id: EquipmentId,
    pub name: String,
    pub position: Position,
    /// ISO-8601, kept as written; parsed when records are compared.
    pub timestamp: String,
}
