use log::{info, warn};

/// Activity log shared by the portal services; every line is tagged with the
/// owning component.
#[derive(Debug, Clone)]
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("{}: {}", self.component, message);
    }

    pub fn failure(&self, operation: &str, error: &dyn std::fmt::Display) {
        warn!("{}: {} failed: {}", self.component, operation, error);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("portal")
    }
}
