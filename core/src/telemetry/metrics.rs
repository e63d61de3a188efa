use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Node outcome counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub derived: usize,
    pub skipped: usize,
    pub failed: usize,
    pub already_present: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<RunMetrics>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RunMetrics::default()),
        }
    }

    pub fn record_derived(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.derived += 1;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn record_present(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.already_present += 1;
        }
    }

    pub fn snapshot(&self) -> RunMetrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            RunMetrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
