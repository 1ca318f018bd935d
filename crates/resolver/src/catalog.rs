use std::collections::HashMap;

use serde::Serialize;

use fm_core::{StateDefinition, StateId};

pub const UNKNOWN_STATE_NAME: &str = "Unknown";
pub const UNKNOWN_STATE_COLOR: &str = "#000000";

/// Name and color shown for a state.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StateDisplay {
    pub name: String,
    pub color: String,
}

impl StateDisplay {
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_STATE_NAME.to_string(),
            color: UNKNOWN_STATE_COLOR.to_string(),
        }
    }
}

impl From<&StateDefinition> for StateDisplay {
    fn from(def: &StateDefinition) -> Self {
        Self {
            name: def.name.clone(),
            color: def.color.clone(),
        }
    }
}

/// Immutable state catalog indexed by id.
///
/// When several definitions share an id the first one listed wins.
#[derive(Debug, Clone, Default)]
pub struct StateCatalog {
    definitions: Vec<StateDefinition>,
    by_id: HashMap<StateId, usize>,
}

impl StateCatalog {
    pub fn new(definitions: Vec<StateDefinition>) -> Self {
        let mut by_id = HashMap::with_capacity(definitions.len());
        for (idx, def) in definitions.iter().enumerate() {
            by_id.entry(def.id.clone()).or_insert(idx);
        }
        Self { definitions, by_id }
    }

    pub fn from_definitions(definitions: &[StateDefinition]) -> Self {
        Self::new(definitions.to_vec())
    }

    pub fn get(&self, id: &str) -> Option<&StateDefinition> {
        self.by_id.get(id).map(|&idx| &self.definitions[idx])
    }

    /// Display values for `id`, falling back to "Unknown"/"#000000".
    pub fn display(&self, id: &str) -> StateDisplay {
        self.get(id).map(StateDisplay::from).unwrap_or_else(StateDisplay::unknown)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl FromIterator<StateDefinition> for StateCatalog {
    fn from_iter<I: IntoIterator<Item = StateDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str, name: &str, color: &str) -> StateDefinition {
        StateDefinition {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn first_definition_wins_on_duplicate_ids() {
        let catalog: StateCatalog = vec![
            def("S1", "Running", "#00FF00"),
            def("S1", "Shadowed", "#FFFFFF"),
            def("S2", "Idle", "#FFFF00"),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("S1").map(|d| d.name.as_str()), Some("Running"));
        assert_eq!(catalog.get("S2").map(|d| d.color.as_str()), Some("#FFFF00"));
    }

    #[test]
    fn display_falls_back_for_unknown_ids() {
        let catalog = StateCatalog::from_definitions(&[def("S1", "Running", "#00FF00")]);
        assert_eq!(catalog.display("S9"), StateDisplay::unknown());
        assert_eq!(catalog.display("S9").name, "Unknown");
        assert_eq!(catalog.display("S9").color, "#000000");
        assert_eq!(catalog.display("S1").name, "Running");
    }
}
