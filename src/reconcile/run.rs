//! Bookkeeping shared by MCE and MME
//!
//! A `SearchRun` owns everything one search invocation needs besides its
//! frontier and its closed sets: the planner boundary, the decode counter,
//! the budget check, the optional trace and the run identity. Its lines are
//! filtered by the run's own log level, never the process-wide one.

use std::time::Instant;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::config::ReconcileConfig;
use super::edit::{Edit, EditSequence};
use super::errors::{ReconcileError, ReconcileResult};
use super::explanation::{Algorithm, Explanation};
use super::frontier::Candidate;
use super::trace::{SearchTrace, TraceOutcome};
use crate::observability::{log_event_at, Event, SearchMetrics, Severity};
use crate::planner::{search_plan, Heuristic, Planner};
use crate::task::{DecodeContext, Gamma, Plan, Task};

pub(crate) struct SearchRun<'a> {
    planner: &'a dyn Planner,
    heuristic: Option<&'a dyn Heuristic>,
    config: &'a ReconcileConfig,
    metrics: &'a SearchMetrics,
    min_severity: Severity,
    decoder: DecodeContext,
    trace: Option<SearchTrace>,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    clock: Instant,
}

impl<'a> SearchRun<'a> {
    pub fn new(
        planner: &'a dyn Planner,
        heuristic: Option<&'a dyn Heuristic>,
        config: &'a ReconcileConfig,
        metrics: &'a SearchMetrics,
    ) -> ReconcileResult<Self> {
        Ok(Self {
            planner,
            heuristic,
            config,
            metrics,
            min_severity: config.log_severity()?,
            decoder: DecodeContext::new(),
            trace: config.record_trace.then(SearchTrace::new),
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            clock: Instant::now(),
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &ReconcileConfig {
        self.config
    }

    pub fn metrics(&self) -> &SearchMetrics {
        self.metrics
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// Logs against the run's own minimum severity
    pub fn log(&self, event: Event, fields: &[(&str, &str)]) {
        log_event_at(self.min_severity, event, fields);
    }

    /// Optimal plan for a candidate model, counted as a planner call
    pub fn plan_for(&self, task: &Task) -> Option<Plan> {
        self.metrics.increment_planner_calls();
        search_plan(self.planner, self.heuristic, task)
    }

    /// Counts one evaluation, failing first if the budget is spent
    pub fn begin_evaluation(&self) -> ReconcileResult<()> {
        if let Some(max) = self.config.max_expansions {
            if self.metrics.evaluated() >= max {
                self.log(
                    Event::BudgetExceeded,
                    &[
                        ("max_expansions", &max.to_string()),
                        ("run_id", &self.run_id.to_string()),
                    ],
                );
                return Err(ReconcileError::ExpansionBudgetExceeded(max));
            }
        }
        self.metrics.increment_evaluated();
        Ok(())
    }

    /// Applies `edit` to `parent` and decodes the resulting model
    pub fn child(&mut self, parent: &Candidate, edit: Edit) -> ReconcileResult<Candidate> {
        let gamma = edit.apply(&parent.gamma)?;
        let task = self.decoder.decode(&gamma);
        self.metrics.increment_generated();
        Ok(Candidate {
            gamma,
            task,
            edits: parent.edits.extended(edit),
        })
    }

    /// Logs the outcome for one candidate and adds it to the trace
    pub fn record(&mut self, depth: usize, diff: &Gamma, outcome: TraceOutcome) {
        let event = match outcome {
            TraceOutcome::Explained => Event::CandidateExplained,
            TraceOutcome::Expanded => Event::NodeExpanded,
            TraceOutcome::Invalid => Event::CandidateInvalid,
            TraceOutcome::PrunedClosed | TraceOutcome::PrunedMonotone => Event::CandidatePruned,
        };
        self.log(
            event,
            &[
                ("depth", &depth.to_string()),
                ("diff_size", &diff.len().to_string()),
                ("outcome", outcome.as_str()),
                ("run_id", &self.run_id.to_string()),
            ],
        );
        if let Some(trace) = self.trace.as_mut() {
            trace.record(depth, diff.clone(), outcome);
        }
    }

    pub fn finish(
        self,
        algorithm: Algorithm,
        plan: &Plan,
        edits: EditSequence,
        model: Task,
    ) -> Explanation {
        Explanation {
            algorithm,
            run_id: self.run_id,
            plan: plan.clone(),
            edits,
            model,
            metrics: self.metrics.snapshot(),
            started_at: self.started_at,
            elapsed_ms: self.clock.elapsed().as_millis() as u64,
            trace: self.trace,
        }
    }
}
