use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::trim::Rejection;

/// Thread-safe run counters. Created at pipeline start, incremented by
/// every worker, snapshotted once after all workers have joined.
#[derive(Debug, Default)]
pub struct Stats {
    total: AtomicU64,
    trimmed: AtomicU64,
    adapter_missing: AtomicU64,
    too_short: AtomicU64,
    low_quality: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr_total(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_trimmed(&self) {
        self.trimmed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self, rejection: Rejection) {
        let counter = match rejection {
            Rejection::AdapterMissing => &self.adapter_missing,
            Rejection::TooShort => &self.too_short,
            Rejection::LowQuality => &self.low_quality,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Read-only snapshot. Only meaningful once all workers have joined;
    /// the counters are not reset.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            trimmed: self.trimmed.load(Ordering::Relaxed),
            adapter_missing: self.adapter_missing.load(Ordering::Relaxed),
            too_short: self.too_short.load(Ordering::Relaxed),
            low_quality: self.low_quality.load(Ordering::Relaxed),
        }
    }
}

/// Finalized run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total: u64,
    pub trimmed: u64,
    pub adapter_missing: u64,
    pub too_short: u64,
    pub low_quality: u64,
}

impl StatsSnapshot {
    pub fn trimmed_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.trimmed as f64 / self.total as f64) * 100.0
        }
    }
}
