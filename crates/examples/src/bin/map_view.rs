use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use fm_core::Position;
use fm_runtime::metrics::{PassTimer, ResolutionMetrics};
use fm_runtime::{init_tracing, load_fixtures, FixtureConfig};
use fm_views::render::{render_json, render_text};
use fm_views::{MapView, MapViewConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Plot the latest known position and state of each equipment.
#[derive(Debug, Parser)]
#[command(name = "map_view")]
struct Args {
    /// Directory holding the fixture files (defaults to $FM_DATA_DIR or ./data).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Open the state-history view for this equipment id.
    #[arg(long)]
    select: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[arg(long, allow_hyphen_values = true, requires = "center_lon")]
    center_lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "center_lat")]
    center_lon: Option<f64>,

    #[arg(long)]
    zoom: Option<u8>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut fixture_cfg = FixtureConfig::default();
    if let Some(dir) = args.data_dir {
        fixture_cfg = fixture_cfg.with_data_dir(dir);
    }

    let mut map_cfg = MapViewConfig::default();
    if let (Some(lat), Some(lon)) = (args.center_lat, args.center_lon) {
        map_cfg.center = Position::new(lat, lon);
    }
    if let Some(zoom) = args.zoom {
        map_cfg.zoom = zoom;
    }

    let metrics = ResolutionMetrics::default();
    let fixtures = load_fixtures(&fixture_cfg)?;
    metrics.record_quarantined(&fixtures.quarantined);

    let timer = PassTimer::start();
    let resolution = fixtures.resolve();
    let elapsed = timer.elapsed();
    metrics.record_pass(&resolution);

    for diag in &resolution.diagnostics {
        warn!(%diag, "resolution diagnostic");
    }
    info!(
        snapshots = resolution.snapshots.len(),
        skipped = resolution.skipped(),
        "resolution complete"
    );
    info!("{}", metrics.snapshot().to_json_line("resolve", Some(elapsed)));

    let mut view = MapView::new(map_cfg, resolution.snapshots, fixtures.catalog);
    if let Some(key) = args.select.as_deref() {
        if let Err(err) = view.activate(key) {
            warn!(%err, "nothing to select");
        }
    }

    match args.format {
        Format::Text => print!("{}", render_text(&view)),
        Format::Json => println!("{}", render_json(&view)?),
    }
    Ok(())
}
