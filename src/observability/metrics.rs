//! Search metrics
//!
//! - Counters only
//! - Monotonic increase within one run
//! - One registry per search run

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters for a single MCE or MME run
#[derive(Debug, Default)]
pub struct SearchMetrics {
    /// Candidates popped and evaluated
    nodes_evaluated: AtomicU64,
    /// Candidates evaluated valid and expanded
    nodes_expanded: AtomicU64,
    /// Children pushed onto the frontier
    nodes_generated: AtomicU64,
    /// Children or pops discarded because their Γ was closed
    closed_hits: AtomicU64,
    /// Children or pops discarded by the monotone rule
    monotone_prunes: AtomicU64,
    /// Candidates that broke the explained plan
    invalid_candidates: AtomicU64,
    /// Calls into the external planner
    planner_calls: AtomicU64,
    /// Pops resolved among relevant candidates
    relevant_pops: AtomicU64,
    /// Pops that fell back to all min-cost candidates
    fallback_pops: AtomicU64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_evaluated(&self) {
        self.nodes_evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_expanded(&self) {
        self.nodes_expanded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_generated(&self) {
        self.nodes_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_closed_hits(&self) {
        self.closed_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_monotone_prunes(&self) {
        self.monotone_prunes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_invalid(&self) {
        self.invalid_candidates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_planner_calls(&self) {
        self.planner_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_relevant_pops(&self) {
        self.relevant_pops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fallback_pops(&self) {
        self.fallback_pops.fetch_add(1, Ordering::Relaxed);
    }

    /// Candidates evaluated so far
    pub fn evaluated(&self) -> u64 {
        self.nodes_evaluated.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            nodes_evaluated: self.nodes_evaluated.load(Ordering::Relaxed),
            nodes_expanded: self.nodes_expanded.load(Ordering::Relaxed),
            nodes_generated: self.nodes_generated.load(Ordering::Relaxed),
            closed_hits: self.closed_hits.load(Ordering::Relaxed),
            monotone_prunes: self.monotone_prunes.load(Ordering::Relaxed),
            invalid_candidates: self.invalid_candidates.load(Ordering::Relaxed),
            planner_calls: self.planner_calls.load(Ordering::Relaxed),
            relevant_pops: self.relevant_pops.load(Ordering::Relaxed),
            fallback_pops: self.fallback_pops.load(Ordering::Relaxed),
        }
    }
}

/// Serializable copy of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub nodes_evaluated: u64,
    pub nodes_expanded: u64,
    pub nodes_generated: u64,
    pub closed_hits: u64,
    pub monotone_prunes: u64,
    pub invalid_candidates: u64,
    pub planner_calls: u64,
    pub relevant_pops: u64,
    pub fallback_pops: u64,
}

impl MetricsSnapshot {
    /// Total pops resolved by the frontier
    pub fn pops(&self) -> u64 {
        self.relevant_pops + self.fallback_pops
    }
}
