use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_POSITIONS_FILE: &str = "equipmentPositionHistory.json";
pub const DEFAULT_HISTORIES_FILE: &str = "equipmentStateHistory.json";
pub const DEFAULT_CATALOG_FILE: &str = "equipmentState.json";

/// Where the three fixture files live. Defaults can be overridden through
/// `FM_DATA_DIR`, `FM_POSITIONS_FILE`, `FM_HISTORIES_FILE` and
/// `FM_CATALOG_FILE`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixtureConfig {
    pub data_dir: PathBuf,
    pub positions_file: String,
    pub histories_file: String,
    pub catalog_file: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl FixtureConfig {
    /// Build from an arbitrary variable source; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("FM_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let positions_file =
            lookup("FM_POSITIONS_FILE").unwrap_or_else(|| DEFAULT_POSITIONS_FILE.to_string());
        let histories_file =
            lookup("FM_HISTORIES_FILE").unwrap_or_else(|| DEFAULT_HISTORIES_FILE.to_string());
        let catalog_file =
            lookup("FM_CATALOG_FILE").unwrap_or_else(|| DEFAULT_CATALOG_FILE.to_string());

        Self {
            data_dir,
            positions_file,
            histories_file,
            catalog_file,
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn positions_path(&self) -> PathBuf {
        self.data_dir.join(&self.positions_file)
    }

    pub fn histories_path(&self) -> PathBuf {
        self.data_dir.join(&self.histories_file)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn unset_variables_take_defaults() {
        let cfg = FixtureConfig::from_lookup(|_| None);
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.positions_path(), PathBuf::from("data/equipmentPositionHistory.json"));
        assert_eq!(cfg.catalog_path(), PathBuf::from("data/equipmentState.json"));
    }

    #[test]
    fn variables_override_defaults() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("FM_DATA_DIR", "/srv/fixtures"), ("FM_CATALOG_FILE", "states.json")]);
        let cfg = FixtureConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.catalog_path(), PathBuf::from("/srv/fixtures/states.json"));
        assert_eq!(
            cfg.histories_path(),
            PathBuf::from("/srv/fixtures/equipmentStateHistory.json")
        );

        let moved = cfg.with_data_dir("elsewhere");
        assert_eq!(moved.catalog_path(), PathBuf::from("elsewhere/states.json"));
    }
}
