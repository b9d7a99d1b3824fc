//! Observable events
//!
//! Events are explicit and typed. Each carries the severity it is
//! logged at.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file read and validated
    ConfigLoaded,
    /// Schema documents compiled into a registry
    SchemasLoaded,
    /// A schema document was rejected
    SchemaRejected,

    // Parsing
    /// A parse produced a value
    ParseComplete,
    /// A parse failed with validation issues
    ParseRejected,
    /// A synchronous parse reached an asynchronous step
    AsyncStepInSyncParse,
    /// An asynchronous parse was cancelled by its caller
    ParseCancelled,

    // Command line
    /// A command finished
    CommandComplete,
    /// A command failed before producing a verdict
    CommandFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::ParseComplete => "PARSE_COMPLETE",
            Event::ParseRejected => "PARSE_REJECTED",
            Event::AsyncStepInSyncParse => "ASYNC_STEP_IN_SYNC_PARSE",
            Event::ParseCancelled => "PARSE_CANCELLED",
            Event::CommandComplete => "COMMAND_COMPLETE",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ParseComplete | Event::ParseRejected => Severity::Trace,
            Event::ConfigLoaded
            | Event::SchemasLoaded
            | Event::ParseCancelled
            | Event::CommandComplete => Severity::Info,
            Event::AsyncStepInSyncParse | Event::SchemaRejected => Severity::Warn,
            Event::CommandFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 9] = [
        Event::ConfigLoaded,
        Event::SchemasLoaded,
        Event::SchemaRejected,
        Event::ParseComplete,
        Event::ParseRejected,
        Event::AsyncStepInSyncParse,
        Event::ParseCancelled,
        Event::CommandComplete,
        Event::CommandFailed,
    ];

    #[test]
    fn test_all_events_have_string_representation() {
        for event in ALL {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_per_parse_events_are_trace() {
        assert_eq!(Event::ParseComplete.severity(), Severity::Trace);
        assert_eq!(Event::ParseRejected.severity(), Severity::Trace);
        assert_eq!(Event::AsyncStepInSyncParse.severity(), Severity::Warn);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::SchemasLoaded), "SCHEMAS_LOADED");
    }
}
