//! Observability for reconciliation runs
//!
//! Provides:
//! - Structured logging (JSON lines)
//! - Typed search events
//! - Per-run search metrics
//! - Run-level observation scopes
//!
//! # Principles
//!
//! 1. Observability is read-only: it never changes search decisions
//! 2. No async or background threads
//! 3. Deterministic output for a given sequence of calls
//!
//! # Usage
//!
//! ```ignore
//! use reconcile::observability::{log_event_at, Event, ObservationScope, SearchMetrics, Severity};
//!
//! let metrics = SearchMetrics::new();
//! let scope = ObservationScope::with_fields("MCE_SEARCH", &[("run_id", "…")]);
//! metrics.increment_evaluated();
//! log_event_at(Severity::Trace, Event::NodeExpanded, &[("depth", "1")]);
//! scope.complete_with_fields(&[("edits", "1")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, SearchMetrics};
pub use scope::ObservationScope;

/// Severity an event is logged at
fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_per_candidate() {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Log a search event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}

/// True if `event` passes a run-level minimum severity
pub fn event_enabled(event: Event, min_severity: Severity) -> bool {
    severity_for(event) >= min_severity
}

/// Log a search event against a run-level minimum severity
pub fn log_event_at(min_severity: Severity, event: Event, fields: &[(&str, &str)]) {
    Logger::log_with_min(min_severity, severity_for(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity() {
        assert_eq!(severity_for(Event::FrontierExhausted), Severity::Fatal);
        assert_eq!(severity_for(Event::NodeExpanded), Severity::Trace);
        assert_eq!(severity_for(Event::SearchBegin), Severity::Info);
    }

    #[test]
    fn test_run_level_filter() {
        assert!(!event_enabled(Event::NodeExpanded, Severity::Info));
        assert!(event_enabled(Event::NodeExpanded, Severity::Trace));
        assert!(event_enabled(Event::FrontierExhausted, Severity::Error));
        assert!(!event_enabled(Event::SearchBegin, Severity::Warn));
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("path", "/tmp/reconcile.json")]);
    }
}
