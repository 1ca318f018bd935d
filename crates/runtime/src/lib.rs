//! Runtime bootstrap: tracing, fixture loading and resolution metrics.

use tracing::Level;

pub mod config;
pub mod fixtures;
pub mod metrics;

pub use config::FixtureConfig;
pub use fixtures::{load_fixtures, Fixtures, LoadError, Quarantined};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .try_init();
}
