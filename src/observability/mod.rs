//! Observability
//!
//! - Structured logging (JSON lines on stderr)
//! - Process-wide parse counters
//! - Typed lifecycle events
//!
//! # Principles
//!
//! 1. Observability is read-only: it never changes a parse outcome
//! 2. No background threads
//! 3. Deterministic output
//!
//! ```ignore
//! use schemakit::observability::{log_event_with_fields, metrics, Event};
//!
//! log_event_with_fields(Event::SchemasLoaded, &[("count", "3")]);
//! println!("{}", metrics().to_json());
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{metrics, MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::ConfigLoaded);
        log_event_with_fields(Event::SchemasLoaded, &[("count", "2")]);
    }
}
