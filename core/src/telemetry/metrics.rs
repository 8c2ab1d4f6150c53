use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Outcome counts for backend calls, with failures broken down by the
/// operation that fell back to an empty result.
#[derive(Debug, Default)]
pub struct CallMetrics {
    fetched: AtomicUsize,
    failures: Mutex<BTreeMap<&'static str, usize>>,
}

impl CallMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self, operation: &'static str) {
        if let Ok(mut failures) = self.failures.lock() {
            *failures.entry(operation).or_default() += 1;
        }
    }

    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failures
            .lock()
            .map(|failures| failures.values().sum())
            .unwrap_or(0)
    }

    /// Failing operations in name order, with how often each fell back.
    pub fn failed_operations(&self) -> Vec<(&'static str, usize)> {
        self.failures
            .lock()
            .map(|failures| failures.iter().map(|(op, n)| (*op, *n)).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for CallMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ok, {} failed", self.fetched(), self.failed())?;
        let failed = self.failed_operations();
        if !failed.is_empty() {
            let parts: Vec<String> = failed
                .iter()
                .map(|(op, n)| format!("{op} x{n}"))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_grouped_by_operation() {
        let metrics = CallMetrics::new();
        metrics.record_fetched();
        metrics.record_failed("get_stations");
        metrics.record_failed("get_networks");
        metrics.record_failed("get_stations");

        assert_eq!(metrics.fetched(), 1);
        assert_eq!(metrics.failed(), 3);
        assert_eq!(
            metrics.failed_operations(),
            vec![("get_networks", 1), ("get_stations", 2)]
        );
        assert_eq!(
            metrics.to_string(),
            "1 ok, 3 failed (get_networks x1, get_stations x2)"
        );
    }

    #[test]
    fn clean_run_has_no_breakdown() {
        let metrics = CallMetrics::new();
        metrics.record_fetched();
        assert_eq!(metrics.to_string(), "1 ok, 0 failed");
        assert!(metrics.failed_operations().is_empty());
    }
}
