use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use fm_core::{CoreError, PositionRecord, StateDefinition, StateHistory};
use fm_resolver::{resolve_with, Resolution, StateCatalog};

use crate::FixtureConfig;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Dataset {
    Positions,
    Histories,
    Catalog,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dataset::Positions => "position history",
            Dataset::Histories => "state history",
            Dataset::Catalog => "state catalog",
        };
        f.write_str(name)
    }
}

/// A fixture element that did not match its record shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Quarantined {
    pub dataset: Dataset,
    pub index: usize,
    pub reason: String,
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("{0} fixture is not a JSON array")]
    NotAnArray(Dataset),
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub positions: Vec<PositionRecord>,
    pub histories: Vec<StateHistory>,
    pub catalog: StateCatalog,
    pub quarantined: Vec<Quarantined>,
}

impl Fixtures {
    pub fn resolve(&self) -> Resolution {
        resolve_with(&self.positions, &self.histories, &self.catalog)
    }
}

/// Parse one fixture document. Elements that fail to deserialize are set
/// aside instead of failing the whole document.
pub fn parse_dataset<T>(
    text: &str,
    dataset: Dataset,
) -> Result<(Vec<T>, Vec<Quarantined>), LoadError>
where
    T: DeserializeOwned,
{
    let doc: Value = serde_json::from_str(text).map_err(CoreError::from)?;
    let Value::Array(items) = doc else {
        return Err(LoadError::NotAnArray(dataset));
    };

    let mut records = Vec::with_capacity(items.len());
    let mut quarantined = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(%dataset, index, error = %err, "quarantining malformed fixture entry");
                quarantined.push(Quarantined {
                    dataset,
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok((records, quarantined))
}

fn load_dataset<T>(
    path: &Path,
    dataset: Dataset,
    quarantined: &mut Vec<Quarantined>,
) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {dataset} fixture {}", path.display()))?;
    let (records, mut bad) = parse_dataset(&text, dataset)
        .with_context(|| format!("parsing {dataset} fixture {}", path.display()))?;
    quarantined.append(&mut bad);
    Ok(records)
}

pub fn load_fixtures(cfg: &FixtureConfig) -> Result<Fixtures> {
    let mut quarantined = Vec::new();
    let positions: Vec<PositionRecord> =
        load_dataset(&cfg.positions_path(), Dataset::Positions, &mut quarantined)?;
    let histories: Vec<StateHistory> =
        load_dataset(&cfg.histories_path(), Dataset::Histories, &mut quarantined)?;
    let definitions: Vec<StateDefinition> =
        load_dataset(&cfg.catalog_path(), Dataset::Catalog, &mut quarantined)?;

    info!(
        positions = positions.len(),
        histories = histories.len(),
        states = definitions.len(),
        quarantined = quarantined.len(),
        dir = %cfg.data_dir.display(),
        "fixtures loaded"
    );

    Ok(Fixtures {
        positions,
        histories,
        catalog: StateCatalog::new(definitions),
        quarantined,
    })
}
