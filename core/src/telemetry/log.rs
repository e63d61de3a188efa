use log::{debug, info, warn};

/// Thin wrapper over the `log` facade so call sites carry one target.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new() -> Self {
        Self { target: "fdrcore" }
    }

    pub fn with_target(target: &'static str) -> Self {
        Self { target }
    }

    /// Run-level summaries.
    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    /// Per-node resolution detail.
    pub fn detail(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
