use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use fm_resolver::{Diagnostic, Resolution};

use crate::Quarantined;

#[derive(Clone, Default)]
pub struct ResolutionMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    passes: AtomicU64,
    records_scanned: AtomicU64,
    snapshots: AtomicU64,
    missing_history: AtomicU64,
    empty_history: AtomicU64,
    unknown_state: AtomicU64,
    malformed_timestamp: AtomicU64,
    quarantined: AtomicU64,
}

impl ResolutionMetrics {
    pub fn record_pass(&self, resolution: &Resolution) {
        self.inner.passes.fetch_add(1, Ordering::Relaxed);
        self.inner
            .records_scanned
            .fetch_add(resolution.scanned as u64, Ordering::Relaxed);
        self.inner
            .snapshots
            .fetch_add(resolution.snapshots.len() as u64, Ordering::Relaxed);
        for diag in &resolution.diagnostics {
            let counter = match diag {
                Diagnostic::MissingStateHistory { .. } => &self.inner.missing_history,
                Diagnostic::EmptyStateSequence { .. } => &self.inner.empty_history,
                Diagnostic::UnknownStateId { .. } => &self.inner.unknown_state,
                Diagnostic::MalformedTimestamp { .. } => &self.inner.malformed_timestamp,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_quarantined(&self, entries: &[Quarantined]) {
        self.inner
            .quarantined
            .fetch_add(entries.len() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            passes: self.inner.passes.load(Ordering::Relaxed),
            records_scanned: self.inner.records_scanned.load(Ordering::Relaxed),
            snapshots: self.inner.snapshots.load(Ordering::Relaxed),
            missing_history: self.inner.missing_history.load(Ordering::Relaxed),
            empty_history: self.inner.empty_history.load(Ordering::Relaxed),
            unknown_state: self.inner.unknown_state.load(Ordering::Relaxed),
            malformed_timestamp: self.inner.malformed_timestamp.load(Ordering::Relaxed),
            quarantined: self.inner.quarantined.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub passes: u64,
    pub records_scanned: u64,
    pub snapshots: u64,
    pub missing_history: u64,
    pub empty_history: u64,
    pub unknown_state: u64,
    pub malformed_timestamp: u64,
    pub quarantined: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Line<'a> {
            label: &'a str,
            #[serde(flatten)]
            counts: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Line {
            label,
            counts: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct PassTimer {
    start: Instant,
}

impl PassTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
