//! Latest-snapshot resolution: joins each equipment's most recent position
//! with the last entry of its state history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use fm_core::{
    parse_timestamp, EquipmentId, EquipmentSnapshot, PositionRecord, StateDefinition,
    StateHistory, StateId,
};

pub mod catalog;

pub use catalog::{StateCatalog, StateDisplay, UNKNOWN_STATE_COLOR, UNKNOWN_STATE_NAME};

/// Why a position record was skipped or a snapshot got fallback values.
/// `record` is the index of the position record in the input.
#[derive(thiserror::Error, Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    #[error("record {record}: no state history for equipment {equipment_id}")]
    MissingStateHistory {
        record: usize,
        equipment_id: EquipmentId,
    },
    #[error("record {record}: state history for equipment {equipment_id} is empty")]
    EmptyStateSequence {
        record: usize,
        equipment_id: EquipmentId,
    },
    #[error("record {record}: equipment {equipment_id} is in unknown state {state_id}")]
    UnknownStateId {
        record: usize,
        equipment_id: EquipmentId,
        state_id: StateId,
    },
    #[error("record {record}: equipment {equipment_id} has unparseable timestamp {raw:?}")]
    MalformedTimestamp {
        record: usize,
        equipment_id: EquipmentId,
        raw: String,
    },
}

impl Diagnostic {
    pub fn record(&self) -> usize {
        match self {
            Diagnostic::MissingStateHistory { record, .. }
            | Diagnostic::EmptyStateSequence { record, .. }
            | Diagnostic::UnknownStateId { record, .. }
            | Diagnostic::MalformedTimestamp { record, .. } => *record,
        }
    }

    /// True when the record was dropped rather than resolved with fallbacks.
    pub fn is_skip(&self) -> bool {
        !matches!(self, Diagnostic::UnknownStateId { .. })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resolution {
    /// One snapshot per equipment, ordered by first write.
    pub snapshots: Vec<EquipmentSnapshot>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of position records scanned.
    pub scanned: usize,
}

impl Resolution {
    pub fn skipped(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_skip()).count()
    }

    pub fn get(&self, equipment_id: &str) -> Option<&EquipmentSnapshot> {
        self.snapshots.iter().find(|s| s.equipment_id == equipment_id)
    }
}

/// Resolve snapshots against a catalog given as plain definitions.
pub fn resolve(
    positions: &[PositionRecord],
    histories: &[StateHistory],
    catalog: &[StateDefinition],
) -> Resolution {
    resolve_with(positions, histories, &StateCatalog::from_definitions(catalog))
}

struct Slot {
    at: DateTime<Utc>,
    snapshot: EquipmentSnapshot,
    /// Set when the snapshot carries fallback state values.
    fallback: Option<Diagnostic>,
}

/// Single pass over `positions`. A record replaces the stored snapshot only
/// when its timestamp is strictly later, so the first record among equal
/// timestamps is kept. Never fails: problems end up in `diagnostics`, sorted
/// by record. `UnknownStateId` is reported once per equipment, for the record
/// that produced its final snapshot.
pub fn resolve_with(
    positions: &[PositionRecord],
    histories: &[StateHistory],
    catalog: &StateCatalog,
) -> Resolution {
    let mut history_index: HashMap<&str, &StateHistory> = HashMap::with_capacity(histories.len());
    for history in histories {
        history_index.entry(history.equipment_id.as_str()).or_insert(history);
    }

    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut slots: Vec<Slot> = Vec::new();
    let mut diagnostics = Vec::new();

    for (record, pos) in positions.iter().enumerate() {
        let at = match parse_timestamp(&pos.timestamp) {
            Ok(at) => at,
            Err(_) => {
                let diag = Diagnostic::MalformedTimestamp {
                    record,
                    equipment_id: pos.equipment_id.clone(),
                    raw: pos.timestamp.clone(),
                };
                debug!(%diag, "skipping position record");
                diagnostics.push(diag);
                continue;
            }
        };

        let existing = order.get(pos.equipment_id.as_str()).copied();
        if let Some(idx) = existing {
            if at <= slots[idx].at {
                continue;
            }
        }

        let Some(history) = history_index.get(pos.equipment_id.as_str()) else {
            let diag = Diagnostic::MissingStateHistory {
                record,
                equipment_id: pos.equipment_id.clone(),
            };
            debug!(%diag, "skipping position record");
            diagnostics.push(diag);
            continue;
        };

        let Some(latest) = history.latest() else {
            let diag = Diagnostic::EmptyStateSequence {
                record,
                equipment_id: pos.equipment_id.clone(),
            };
            debug!(%diag, "skipping position record");
            diagnostics.push(diag);
            continue;
        };

        let (display, fallback) = match catalog.get(&latest.equipment_state_id) {
            Some(def) => (StateDisplay::from(def), None),
            None => {
                let diag = Diagnostic::UnknownStateId {
                    record,
                    equipment_id: pos.equipment_id.clone(),
                    state_id: latest.equipment_state_id.clone(),
                };
                (StateDisplay::unknown(), Some(diag))
            }
        };

        let slot = Slot {
            at,
            snapshot: EquipmentSnapshot {
                equipment_id: pos.equipment_id.clone(),
                name: pos.name.clone(),
                position: pos.position,
                timestamp: pos.timestamp.clone(),
                state_name: display.name,
                state_color: display.color,
                state_history: history.states.clone(),
            },
            fallback,
        };

        match existing {
            Some(idx) => slots[idx] = slot,
            None => {
                order.insert(pos.equipment_id.as_str(), slots.len());
                slots.push(slot);
            }
        }
    }

    let mut snapshots = Vec::with_capacity(slots.len());
    for slot in slots {
        if let Some(diag) = slot.fallback {
            debug!(%diag, "using fallback state");
            diagnostics.push(diag);
        }
        snapshots.push(slot.snapshot);
    }
    diagnostics.sort_by_key(Diagnostic::record);

    Resolution {
        snapshots,
        diagnostics,
        scanned: positions.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_core::{Position, StateEvent};

    fn pos(id: &str, lat: f64, ts: &str) -> PositionRecord {
        PositionRecord {
            equipment_id: id.to_string(),
            name: format!("{id}-name"),
            position: Position::new(lat, -45.9),
            timestamp: ts.to_string(),
        }
    }

    fn history(id: &str, states: &[&str]) -> StateHistory {
        StateHistory {
            equipment_id: id.to_string(),
            states: states
                .iter()
                .map(|s| StateEvent {
                    equipment_state_id: s.to_string(),
                    timestamp: "2024-01-01T09:00:00Z".to_string(),
                })
                .collect(),
        }
    }

    fn catalog() -> Vec<StateDefinition> {
        vec![StateDefinition {
            id: "S1".to_string(),
            name: "Running".to_string(),
            color: "#00FF00".to_string(),
        }]
    }

    #[test]
    fn compares_chronologically_not_lexically() {
        // 08:30-05:00 sorts before 12:00Z as text but is 13:30 UTC.
        let positions = vec![
            pos("E1", 1.0, "2024-01-01T12:00:00Z"),
            pos("E1", 2.0, "2024-01-01T08:30:00-05:00"),
        ];
        let out = resolve(&positions, &[history("E1", &["S1"])], &catalog());
        assert_eq!(out.snapshots.len(), 1);
        assert_eq!(out.snapshots[0].position.latitude, 2.0);
    }

    #[test]
    fn empty_state_sequence_is_skipped_and_reported() {
        let positions = vec![pos("E1", 1.0, "2024-01-01T10:00:00Z")];
        let out = resolve(&positions, &[history("E1", &[])], &catalog());
        assert!(out.snapshots.is_empty());
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::EmptyStateSequence {
                record: 0,
                equipment_id: "E1".to_string()
            }]
        );
        assert_eq!(out.skipped(), 1);
    }

    #[test]
    fn malformed_timestamp_skips_only_that_record() {
        let positions = vec![
            pos("E1", 1.0, "2024-01-01T10:00:00Z"),
            pos("E1", 2.0, "not a time"),
        ];
        let out = resolve(&positions, &[history("E1", &["S1"])], &catalog());
        assert_eq!(out.snapshots.len(), 1);
        assert_eq!(out.snapshots[0].position.latitude, 1.0);
        assert!(matches!(
            out.diagnostics.as_slice(),
            [Diagnostic::MalformedTimestamp { record: 1, raw, .. }] if raw == "not a time"
        ));
    }

    #[test]
    fn order_follows_first_write() {
        let positions = vec![
            pos("E2", 1.0, "2024-01-01T10:00:00Z"),
            pos("E1", 1.0, "2024-01-01T10:00:00Z"),
            pos("E2", 3.0, "2024-01-01T12:00:00Z"),
        ];
        let histories = vec![history("E1", &["S1"]), history("E2", &["S1"])];
        let out = resolve(&positions, &histories, &catalog());
        let ids: Vec<&str> = out.snapshots.iter().map(|s| s.equipment_id.as_str()).collect();
        assert_eq!(ids, ["E2", "E1"]);
        assert_eq!(out.get("E2").map(|s| s.position.latitude), Some(3.0));
        assert_eq!(out.scanned, 3);
    }

    #[test]
    fn first_history_wins_on_duplicate_equipment() {
        let positions = vec![pos("E1", 1.0, "2024-01-01T10:00:00Z")];
        let histories = vec![history("E1", &["S1"]), history("E1", &["S9"])];
        let out = resolve(&positions, &histories, &catalog());
        assert_eq!(out.snapshots[0].state_name, "Running");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn unknown_state_reported_once_for_final_write() {
        let positions = vec![
            pos("E1", 1.0, "2024-01-01T10:00:00Z"),
            pos("E2", 5.0, "not a time"),
            pos("E1", 2.0, "2024-01-01T11:00:00Z"),
            pos("E1", 3.0, "2024-01-01T12:00:00Z"),
        ];
        let out = resolve(&positions, &[history("E1", &["S9"])], &catalog());

        assert_eq!(out.snapshots[0].position.latitude, 3.0);
        assert_eq!(out.snapshots[0].state_name, "Unknown");
        let records: Vec<usize> = out.diagnostics.iter().map(Diagnostic::record).collect();
        assert_eq!(records, [1, 3]);
        assert!(matches!(
            &out.diagnostics[1],
            Diagnostic::UnknownStateId { state_id, .. } if state_id == "S9"
        ));
    }

    #[test]
    fn diagnostics_render_readably() {
        let diag = Diagnostic::UnknownStateId {
            record: 4,
            equipment_id: "E7".to_string(),
            state_id: "S9".to_string(),
        };
        assert_eq!(diag.to_string(), "record 4: equipment E7 is in unknown state S9");
        assert!(!diag.is_skip());
    }
}
