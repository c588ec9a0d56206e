//! Minimal Complete Explanation search
//!
//! Uniform-cost search over edit count from M_h toward M_r. The first popped
//! candidate in which the explained plan is optimal ends the search; since
//! every candidate of cost `c` is popped before any of cost `c + 1`, its
//! edit sequence is minimal regardless of how ties were broken.

use std::collections::HashSet;

use rand::Rng;

use super::config::RelevanceReference;
use super::edit::{edits_toward, EditSequence};
use super::errors::ReconcileResult;
use super::frontier::{Candidate, Frontier};
use super::run::SearchRun;
use super::trace::TraceOutcome;
use crate::task::{is_optimal, Gamma, Plan, Task};

/// Runs MCE, returning the edits and the reconciled model.
///
/// An exhausted frontier surfaces as `FrontierExhausted`; it cannot happen
/// when M_r itself makes the explained plan optimal.
pub(crate) fn search<R: Rng>(
    run: &mut SearchRun<'_>,
    frontier: &mut Frontier<'_, R>,
    explained_plan: &Plan,
    robot: &Task,
    human: &Task,
) -> ReconcileResult<(EditSequence, Task)> {
    let robot_gamma = robot.gamma();
    let human_gamma = human.gamma();
    let mut closed: HashSet<Gamma> = HashSet::new();
    let mut last_popped = human.clone();

    frontier.push(Candidate::root(human), 0);

    loop {
        let reference = match run.config().relevance_reference {
            RelevanceReference::Target => robot,
            RelevanceReference::LastPopped => &last_popped,
        };
        let (candidate, cost) = frontier.pop(reference)?;
        last_popped = candidate.task.clone();

        let diff = candidate.gamma.symmetric_difference(&human_gamma);
        if closed.contains(&candidate.gamma) {
            run.metrics().increment_closed_hits();
            run.record(candidate.depth(), &diff, TraceOutcome::PrunedClosed);
            continue;
        }

        run.begin_evaluation()?;
        let optimal_plan = run.plan_for(&candidate.task);
        if is_optimal(explained_plan, &candidate.task, optimal_plan.as_ref()) {
            run.record(candidate.depth(), &diff, TraceOutcome::Explained);
            return Ok((candidate.edits, candidate.task));
        }

        closed.insert(candidate.gamma.clone());
        run.metrics().increment_expanded();
        run.record(candidate.depth(), &diff, TraceOutcome::Expanded);

        for edit in edits_toward(&candidate.gamma, &robot_gamma) {
            let child = run.child(&candidate, edit)?;
            if closed.contains(&child.gamma) {
                run.metrics().increment_closed_hits();
                continue;
            }
            frontier.push(child, cost + 1);
        }
    }
}
