//! Terminal and JSON rendering of the map view.

use std::fmt::Write as _;

use crate::{HistoryView, MapView, Marker};

pub fn marker_line(marker: &Marker) -> String {
    format!(
        "{:<12} {:<20} ({:>10.6}, {:>11.6})  {} {}",
        marker.key,
        marker.name,
        marker.position.latitude,
        marker.position.longitude,
        marker.state_name,
        marker.state_color,
    )
}

/// Marker list with a header naming the map center and zoom.
pub fn render_text(view: &MapView) -> String {
    let cfg = view.config();
    let markers = view.markers();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "map center ({:.6}, {:.6}) zoom {} - {} markers",
        cfg.center.latitude,
        cfg.center.longitude,
        cfg.zoom,
        markers.len()
    );
    for marker in &markers {
        let _ = writeln!(out, "{}", marker_line(marker));
    }
    if let Some(detail) = view.detail() {
        out.push('\n');
        out.push_str(&render_modal(&detail));
    }
    out
}

pub fn render_modal(detail: &HistoryView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", detail.title);
    let _ = writeln!(out, "State history");
    for line in detail.lines() {
        let _ = writeln!(out, "  - {line}");
    }
    out
}

pub fn render_json(view: &MapView) -> serde_json::Result<String> {
    #[derive(serde::Serialize)]
    struct Payload<'a> {
        map: &'a crate::MapViewConfig,
        markers: Vec<Marker>,
        detail: Option<HistoryView>,
    }

    let payload = Payload {
        map: view.config(),
        markers: view.markers(),
        detail: view.detail(),
    };
    serde_json::to_string_pretty(&payload)
}
