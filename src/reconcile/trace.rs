//! Per-candidate search trace

use serde::{Deserialize, Serialize};

use crate::task::Gamma;

/// What happened to a popped or generated candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOutcome {
    /// Explained plan is optimal in the candidate (MCE success)
    Explained,
    /// Candidate evaluated and its children generated
    Expanded,
    /// Explained plan breaks in the candidate (MME)
    Invalid,
    /// Candidate's encoding was already closed
    PrunedClosed,
    /// Candidate's diff contains a diff known to be invalid (MME)
    PrunedMonotone,
}

impl TraceOutcome {
    /// True for outcomes that required a planner call on the candidate
    pub fn is_evaluated(&self) -> bool {
        matches!(
            self,
            TraceOutcome::Explained | TraceOutcome::Expanded | TraceOutcome::Invalid
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TraceOutcome::Explained => "explained",
            TraceOutcome::Expanded => "expanded",
            TraceOutcome::Invalid => "invalid",
            TraceOutcome::PrunedClosed => "pruned_closed",
            TraceOutcome::PrunedMonotone => "pruned_monotone",
        }
    }
}

/// One trace entry.
///
/// `diff` is the candidate's encoding against the model the search started
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub depth: usize,
    pub diff: Gamma,
    pub outcome: TraceOutcome,
}

/// Ordered trace of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTrace(Vec<TraceEvent>);

impl SearchTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, depth: usize, diff: Gamma, outcome: TraceOutcome) {
        self.0.push(TraceEvent {
            depth,
            diff,
            outcome,
        });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Events with the given outcome, in recording order
    pub fn with_outcome(&self, outcome: TraceOutcome) -> impl Iterator<Item = &TraceEvent> {
        self.0.iter().filter(move |event| event.outcome == outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_filter() {
        let mut trace = SearchTrace::new();
        trace.record(0, Gamma::new(), TraceOutcome::Expanded);
        trace.record(1, Gamma::from_meta_strings(["init-has-p"]), TraceOutcome::Invalid);
        trace.record(1, Gamma::from_meta_strings(["goal-has-q"]), TraceOutcome::Expanded);

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.with_outcome(TraceOutcome::Expanded).count(), 2);
        assert!(trace.events().iter().all(|e| e.outcome.is_evaluated()));
        assert!(!TraceOutcome::PrunedMonotone.is_evaluated());
    }

    #[test]
    fn test_serialized_form() {
        let mut trace = SearchTrace::new();
        trace.record(2, Gamma::from_meta_strings(["init-has-p"]), TraceOutcome::PrunedClosed);
        let json = serde_json::to_string(&trace).unwrap();
        assert_eq!(
            json,
            r#"[{"depth":2,"diff":[{"init_has":"p"}],"outcome":"pruned_closed"}]"#
        );
    }
}
