//! Presentation adapter: markers, popups, the state-history modal and the
//! selection that opens it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use fm_core::{EquipmentId, EquipmentSnapshot, Position};
use fm_resolver::StateCatalog;

pub mod history;
pub mod render;

pub use history::{HistoryEntry, HistoryView, NO_HISTORY_PLACEHOLDER};

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapViewConfig {
    pub center: Position,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: Position::new(-19.126536, -45.947756),
            zoom: 13,
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

/// One map marker, built from a snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub key: EquipmentId,
    pub name: String,
    pub position: Position,
    pub state_name: String,
    pub state_color: String,
}

impl Marker {
    pub fn popup_text(&self) -> String {
        format!("{}\nState: {}", self.name, self.state_name)
    }
}

impl From<&EquipmentSnapshot> for Marker {
    fn from(snap: &EquipmentSnapshot) -> Self {
        Self {
            key: snap.equipment_id.clone(),
            name: snap.name.clone(),
            position: snap.position,
            state_name: snap.state_name.clone(),
            state_color: snap.state_color.clone(),
        }
    }
}

pub fn markers(snapshots: &[EquipmentSnapshot]) -> Vec<Marker> {
    snapshots.iter().map(Marker::from).collect()
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ViewError {
    #[error("no marker for equipment {0}")]
    UnknownMarker(EquipmentId),
}

/// Which equipment's detail view is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    /// Index into the view's snapshots.
    Selected(usize),
}

/// Map state for one resolution pass. Owns the snapshots, the catalog used
/// to render history entries, and the current selection.
#[derive(Debug)]
pub struct MapView {
    config: MapViewConfig,
    snapshots: Vec<EquipmentSnapshot>,
    catalog: StateCatalog,
    selection: Selection,
}

impl MapView {
    pub fn new(
        config: MapViewConfig,
        snapshots: Vec<EquipmentSnapshot>,
        catalog: StateCatalog,
    ) -> Self {
        Self {
            config,
            snapshots,
            catalog,
            selection: Selection::None,
        }
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    pub fn markers(&self) -> Vec<Marker> {
        markers(&self.snapshots)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<&EquipmentSnapshot> {
        match self.selection {
            Selection::None => None,
            Selection::Selected(idx) => self.snapshots.get(idx),
        }
    }

    /// Marker activation. Replaces any current selection; an unknown key
    /// leaves the selection as it was.
    pub fn activate(&mut self, key: &str) -> Result<&EquipmentSnapshot, ViewError> {
        let idx = self
            .snapshots
            .iter()
            .position(|s| s.equipment_id == key)
            .ok_or_else(|| ViewError::UnknownMarker(key.to_string()))?;
        debug!(equipment = key, "marker activated");
        self.selection = Selection::Selected(idx);
        Ok(&self.snapshots[idx])
    }

    pub fn dismiss(&mut self) {
        if self.selection != Selection::None {
            debug!("detail view dismissed");
        }
        self.selection = Selection::None;
    }

    /// History modal for the selected equipment, resolved against the
    /// catalog now rather than taken from the snapshot's current state.
    pub fn detail(&self) -> Option<HistoryView> {
        self.selected().map(|snap| HistoryView::build(snap, &self.catalog))
    }
}
