use serde::Serialize;

use fm_core::{parse_timestamp, EquipmentSnapshot, StateEvent};
use fm_resolver::StateCatalog;

pub const NO_HISTORY_PLACEHOLDER: &str = "No state history found.";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub state_name: String,
    pub state_color: String,
    pub when: String,
}

impl HistoryEntry {
    fn resolve(event: &StateEvent, catalog: &StateCatalog) -> Self {
        let display = catalog.display(&event.equipment_state_id);
        Self {
            state_name: display.name,
            state_color: display.color,
            when: format_when(&event.timestamp),
        }
    }
}

/// Contents of the state-history modal.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HistoryView {
    pub title: String,
    pub entries: Vec<HistoryEntry>,
}

impl HistoryView {
    pub fn build(snapshot: &EquipmentSnapshot, catalog: &StateCatalog) -> Self {
        Self {
            title: snapshot.name.clone(),
            entries: snapshot
                .state_history
                .iter()
                .map(|event| HistoryEntry::resolve(event, catalog))
                .collect(),
        }
    }

    /// One line per entry, or the placeholder when there are none.
    pub fn lines(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![NO_HISTORY_PLACEHOLDER.to_string()];
        }
        self.entries
            .iter()
            .map(|e| format!("{} - {}", e.state_name, e.when))
            .collect()
    }
}

fn format_when(raw: &str) -> String {
    match parse_timestamp(raw) {
        Ok(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_core::{Position, StateDefinition};

    fn event(id: &str, ts: &str) -> StateEvent {
        StateEvent {
            equipment_state_id: id.to_string(),
            timestamp: ts.to_string(),
        }
    }

    fn snapshot(history: Vec<StateEvent>) -> EquipmentSnapshot {
        EquipmentSnapshot {
            equipment_id: "E1".to_string(),
            name: "Loader1".to_string(),
            position: Position::new(0.0, 0.0),
            timestamp: "2024-01-01T11:00:00Z".to_string(),
            state_name: "Stale".to_string(),
            state_color: "#123456".to_string(),
            state_history: history,
        }
    }

    fn catalog() -> StateCatalog {
        StateCatalog::new(vec![
            StateDefinition {
                id: "S1".to_string(),
                name: "Running".to_string(),
                color: "#00FF00".to_string(),
            },
            StateDefinition {
                id: "S2".to_string(),
                name: "Stopped".to_string(),
                color: "#FF0000".to_string(),
            },
        ])
    }

    #[test]
    fn entries_resolve_against_catalog_in_order() {
        let snap = snapshot(vec![
            event("S1", "2024-01-01T08:00:00Z"),
            event("S9", "2024-01-01T09:00:00-03:00"),
            event("S2", "garbled"),
        ]);
        let view = HistoryView::build(&snap, &catalog());

        assert_eq!(view.title, "Loader1");
        assert_eq!(
            view.lines(),
            [
                "Running - 2024-01-01 08:00:00",
                "Unknown - 2024-01-01 12:00:00",
                "Stopped - garbled",
            ]
        );
        assert_eq!(view.entries[1].state_color, "#000000");
        assert_eq!(view.entries[2].state_color, "#FF0000");
    }

    #[test]
    fn uses_catalog_not_snapshot_state() {
        let snap = snapshot(vec![event("S1", "2024-01-01T08:00:00Z")]);
        let view = HistoryView::build(&snap, &catalog());
        assert_eq!(view.entries[0].state_name, "Running");
    }

    #[test]
    fn empty_history_shows_placeholder() {
        let view = HistoryView::build(&snapshot(Vec::new()), &catalog());
        assert!(view.entries.is_empty());
        assert_eq!(view.lines(), [NO_HISTORY_PLACEHOLDER]);
    }
}
