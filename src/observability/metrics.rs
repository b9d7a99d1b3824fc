//! Parse counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Lock-free: relaxed atomics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Operational counters of the validation engine
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Top-level parse calls, both modes
    parses: AtomicU64,
    /// Parse calls made through the asynchronous entry points
    async_parses: AtomicU64,
    /// Parses that produced a value
    successes: AtomicU64,
    /// Parses that produced issues
    failures: AtomicU64,
    /// Issues reported across all failed parses
    issues: AtomicU64,
    /// Synchronous parses that reached an asynchronous step
    configuration_errors: AtomicU64,
    /// Asynchronous parses abandoned on cancellation
    cancellations: AtomicU64,
    /// Schema documents compiled by registries
    schemas_loaded: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_parses(&self) {
        self.parses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_async_parses(&self) {
        self.async_parses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_successes(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one failed parse and the number of issues it reported
    pub fn record_failure(&self, issue_count: u64) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.issues.fetch_add(issue_count, Ordering::Relaxed);
    }

    pub fn increment_configuration_errors(&self) {
        self.configuration_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cancellations(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_schemas_loaded(&self, count: u64) {
        self.schemas_loaded.fetch_add(count, Ordering::Relaxed);
    }

    pub fn parses(&self) -> u64 {
        self.parses.load(Ordering::Relaxed)
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"async_parses":{},"cancellations":{},"configuration_errors":{},"failures":{},"issues":{},"parses":{},"schemas_loaded":{},"successes":{}}}"#,
            s.async_parses,
            s.cancellations,
            s.configuration_errors,
            s.failures,
            s.issues,
            s.parses,
            s.schemas_loaded,
            s.successes,
        )
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            parses: self.parses.load(Ordering::Relaxed),
            async_parses: self.async_parses.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            issues: self.issues.load(Ordering::Relaxed),
            configuration_errors: self.configuration_errors.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            schemas_loaded: self.schemas_loaded.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub parses: u64,
    pub async_parses: u64,
    pub successes: u64,
    pub failures: u64,
    pub issues: u64,
    pub configuration_errors: u64,
    pub cancellations: u64,
    pub schemas_loaded: u64,
}

/// Process-wide registry fed by the parse entry points
pub fn metrics() -> &'static MetricsRegistry {
    static GLOBAL: OnceLock<MetricsRegistry> = OnceLock::new();
    GLOBAL.get_or_init(MetricsRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.parses, 0);
        assert_eq!(snapshot.failures, 0);
        assert_eq!(snapshot.issues, 0);
    }

    #[test]
    fn test_record_failure_counts_issues() {
        let registry = MetricsRegistry::new();
        registry.record_failure(3);
        registry.record_failure(1);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.failures, 2);
        assert_eq!(snapshot.issues, 4);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_parses();
        registry.increment_cancellations();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["parses"], 1);
        assert_eq!(parsed["cancellations"], 1);
        assert_eq!(parsed["successes"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_parses();
                    reg.increment_successes();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.parses, 1000);
        assert_eq!(snapshot.successes, 1000);
    }
}
