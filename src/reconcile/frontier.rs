//! Relevance-ordered open list
//!
//! Entries are popped by minimum cost. Ties go to candidates whose factual
//! difference from the reference model touches an operator of either the
//! reference's optimal plan or the explained plan; when no tied entry is
//! relevant, any tied entry may be drawn. Draws are uniform over the chosen
//! pool, using the frontier's own random source.

use std::collections::BTreeSet;

use rand::Rng;

use super::edit::EditSequence;
use super::errors::{ReconcileError, ReconcileResult};
use crate::observability::SearchMetrics;
use crate::planner::{search_plan, Heuristic, Planner};
use crate::task::{Gamma, Operator, Plan, Task};

/// A hypothesized model and the edits that produced it
#[derive(Debug, Clone)]
pub struct Candidate {
    pub gamma: Gamma,
    pub task: Task,
    pub edits: EditSequence,
}

impl Candidate {
    /// The unedited starting model
    pub fn root(task: &Task) -> Self {
        Self {
            gamma: task.gamma(),
            task: task.clone(),
            edits: EditSequence::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.edits.len()
    }
}

/// Open list of candidates
pub struct Frontier<'a, R: Rng> {
    entries: Vec<(u32, Candidate)>,
    planner: &'a dyn Planner,
    heuristic: Option<&'a dyn Heuristic>,
    explained_plan: &'a Plan,
    metrics: &'a SearchMetrics,
    rng: R,
    /// Distinct operators of the reference's optimal plan and the explained
    /// plan, keyed by the reference encoding they were computed for
    touched: Option<(Gamma, Vec<Operator>)>,
}

impl<'a, R: Rng> Frontier<'a, R> {
    pub fn new(
        planner: &'a dyn Planner,
        heuristic: Option<&'a dyn Heuristic>,
        explained_plan: &'a Plan,
        metrics: &'a SearchMetrics,
        rng: R,
    ) -> Self {
        Self {
            entries: Vec::new(),
            planner,
            heuristic,
            explained_plan,
            metrics,
            rng,
            touched: None,
        }
    }

    pub fn push(&mut self, candidate: Candidate, cost: u32) {
        self.entries.push((cost, candidate));
    }

    /// Removes and returns one minimum-cost entry, preferring entries relevant
    /// to `reference`.
    ///
    /// Fails with `FrontierExhausted` when empty.
    pub fn pop(&mut self, reference: &Task) -> ReconcileResult<(Candidate, u32)> {
        let Some(min_cost) = self.entries.iter().map(|(cost, _)| *cost).min() else {
            return Err(ReconcileError::FrontierExhausted);
        };
        let tied: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (cost, _))| *cost == min_cost)
            .map(|(index, _)| index)
            .collect();

        let reference_gamma = reference.gamma();
        self.refresh_touched(reference, &reference_gamma);
        let touched = self
            .touched
            .as_ref()
            .map(|(_, operators)| operators.as_slice())
            .unwrap_or_default();
        let relevant: Vec<usize> = tied
            .iter()
            .copied()
            .filter(|&index| {
                let diff = self.entries[index]
                    .1
                    .gamma
                    .symmetric_difference(&reference_gamma);
                diff.underlying_facts()
                    .iter()
                    .any(|fact| touched.iter().any(|op| op.mentions(fact)))
            })
            .collect();

        let pool = if relevant.is_empty() {
            self.metrics.increment_fallback_pops();
            &tied
        } else {
            self.metrics.increment_relevant_pops();
            &relevant
        };
        let pick = pool[self.rng.gen_range(0..pool.len())];
        let (cost, candidate) = self.entries.swap_remove(pick);
        Ok((candidate, cost))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn refresh_touched(&mut self, reference: &Task, reference_gamma: &Gamma) {
        if let Some((gamma, _)) = &self.touched {
            if gamma == reference_gamma {
                return;
            }
        }

        self.metrics.increment_planner_calls();
        let reference_plan =
            search_plan(self.planner, self.heuristic, reference).unwrap_or_else(Plan::empty);
        let mut operators: BTreeSet<&Operator> = reference_plan.distinct_operators();
        operators.extend(self.explained_plan.distinct_operators());
        let operators = operators.into_iter().cloned().collect();
        self.touched = Some((reference_gamma.clone(), operators));
    }
}
