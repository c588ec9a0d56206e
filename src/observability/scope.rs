//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` or `{name}_FAILED` when finished
//! - Logs `{name}_INCOMPLETE` on drop if never finished

use std::cell::Cell;

use super::logger::{Logger, Severity};

/// A scope that logs the lifecycle of one search run
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    min_severity: Severity,
}

impl<'a> ObservationScope<'a> {
    /// Create a scope with fields attached to every line it logs
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Self::with_min_severity(name, fields, Logger::min_severity())
    }

    /// Create a scope that filters its lines against `min_severity` rather
    /// than the process-wide minimum
    pub fn with_min_severity(
        name: &'a str,
        fields: &[(&'a str, &str)],
        min_severity: Severity,
    ) -> Self {
        let scope = Self {
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            min_severity,
        };
        scope.log(Severity::Info, "BEGIN", &scope.field_refs());
        scope
    }

    fn log(&self, severity: Severity, suffix: &str, fields: &[(&str, &str)]) {
        Logger::log_with_min(
            self.min_severity,
            severity,
            &format!("{}_{}", self.name, suffix),
            fields,
        );
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }

    /// Finish successfully, logging the extra fields as well
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let mut all = self.field_refs();
        all.extend(extra_fields.iter().copied());
        self.log(Severity::Info, "COMPLETE", &all);
    }

    /// Finish with a failure
    pub fn fail(self, reason: &str) {
        self.completed.set(true);
        let mut all = self.field_refs();
        all.push(("reason", reason));
        self.log(Severity::Error, "FAILED", &all);
    }

    /// Finish with a broken invariant
    pub fn fail_fatal(self, reason: &str) {
        self.completed.set(true);
        let mut all = self.field_refs();
        all.push(("reason", reason));
        self.log(Severity::Fatal, "FAILED", &all);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            let mut all = self.field_refs();
            all.push(("reason", "scope dropped without completion"));
            self.log(Severity::Warn, "INCOMPLETE", &all);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::with_fields("MCE_SEARCH", &[("run_id", "r1")]);
        assert!(!scope.is_completed());
        scope.complete_with_fields(&[("edits", "1")]);
    }

    #[test]
    fn test_scope_fail() {
        let scope = ObservationScope::with_fields("MME_SEARCH", &[]);
        scope.fail("budget");
    }

    #[test]
    fn test_scope_with_run_level_minimum() {
        let scope = ObservationScope::with_min_severity("MME_SEARCH", &[], Severity::Fatal);
        assert!(!scope.is_completed());
        scope.fail("budget");
    }

    #[test]
    fn test_scope_drop_without_completion() {
        let _scope = ObservationScope::with_fields("MCE_SEARCH", &[]);
    }
}
