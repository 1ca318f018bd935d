//! Core record types for Fleet Map.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EquipmentId = String;
pub type StateId = String;

/// Latitude/longitude pair, passed through untouched.
///
/// Fixtures may spell it as `[lat, lng]` or as an object with `lat`/`lng`
/// (or `latitude`/`longitude`) keys. It is always written back as a pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "PositionRepr", into = "[f64; 2]")]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Pair([f64; 2]),
    Object {
        #[serde(alias = "latitude")]
        lat: f64,
        #[serde(alias = "longitude")]
        lng: f64,
    },
}

impl From<PositionRepr> for Position {
    fn from(repr: PositionRepr) -> Self {
        match repr {
            PositionRepr::Pair([latitude, longitude]) => Self { latitude, longitude },
            PositionRepr::Object { lat, lng } => Self { latitude: lat, longitude: lng },
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.latitude, p.longitude]
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unparseable timestamp {raw:?}")]
    Timestamp { raw: String },
}

/// Parse an ISO-8601 timestamp into a UTC instant.
///
/// Accepts extended or basic offsets (`Z`, `-03:00`, `+0300`) with or without
/// seconds. Offset-less date-times and bare dates are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let zoned = match trimmed.strip_suffix(&['Z', 'z'][..]) {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%dT%H:%M%z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(CoreError::Timestamp { raw: raw.to_string() })
}

pub mod position;
pub mod state;
pub mod snapshot;

pub use position::PositionRecord;
pub use snapshot::EquipmentSnapshot;
pub use state::{StateDefinition, StateEvent, StateHistory};
