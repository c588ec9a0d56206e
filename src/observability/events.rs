//! Observable search events
//!
//! Events are explicit and typed. Run-level events are logged at INFO,
//! per-candidate events at TRACE.

use std::fmt;

/// Observable events during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded from file
    ConfigLoaded,

    // Run lifecycle
    /// MCE or MME run started
    SearchBegin,
    /// MCE or MME run finished
    SearchComplete,

    // Per candidate
    /// Candidate evaluated valid and its children generated
    NodeExpanded,
    /// Candidate makes the explained plan optimal (MCE goal)
    CandidateExplained,
    /// Candidate breaks the explained plan (MME)
    CandidateInvalid,
    /// Candidate discarded by the closed set or monotone rule
    CandidatePruned,

    // Data quality
    /// String meta-fact matched no template and was dropped
    MalformedMetaFact,

    // Failures
    /// Pop attempted on an empty frontier (FATAL)
    FrontierExhausted,
    /// Expansion budget from the configuration was reached
    BudgetExceeded,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SearchBegin => "SEARCH_BEGIN",
            Event::SearchComplete => "SEARCH_COMPLETE",
            Event::NodeExpanded => "NODE_EXPANDED",
            Event::CandidateExplained => "CANDIDATE_EXPLAINED",
            Event::CandidateInvalid => "CANDIDATE_INVALID",
            Event::CandidatePruned => "CANDIDATE_PRUNED",
            Event::MalformedMetaFact => "MALFORMED_META_FACT",
            Event::FrontierExhausted => "FRONTIER_EXHAUSTED",
            Event::BudgetExceeded => "BUDGET_EXCEEDED",
        }
    }

    /// True if this event signals a broken invariant
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::FrontierExhausted)
    }

    /// True if this event is emitted once per candidate
    pub fn is_per_candidate(&self) -> bool {
        matches!(
            self,
            Event::NodeExpanded
                | Event::CandidateExplained
                | Event::CandidateInvalid
                | Event::CandidatePruned
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
