//! Minimal Monotone Explanation search
//!
//! Explores from M_r toward M_h until the frontier is empty. A candidate is
//! valid while the explained plan stays applicable and no longer than the
//! candidate's optimal plan. The diff of every invalid candidate against
//! M_r is remembered; any later candidate whose diff contains one of them
//! is discarded without evaluation, both when generated and when popped.
//!
//! The reported sequence is the longest one whose model was evaluated valid.

use std::collections::HashSet;

use rand::Rng;

use super::config::RelevanceReference;
use super::edit::{edits_toward, EditSequence};
use super::errors::ReconcileResult;
use super::frontier::{Candidate, Frontier};
use super::run::SearchRun;
use super::trace::TraceOutcome;
use crate::task::{is_applicable, Gamma, Plan, Task};

/// Runs MME, returning the best edits and the model they lead to
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
    let mut bad_diffs: Vec<Gamma> = Vec::new();
    let mut best = (EditSequence::new(), robot.clone());
    let mut last_popped = human.clone();

    frontier.push(Candidate::root(robot), 0);

    while !frontier.is_empty() {
        let reference = match run.config().relevance_reference {
            RelevanceReference::Target => human,
            RelevanceReference::LastPopped => &last_popped,
        };
        let (candidate, cost) = frontier.pop(reference)?;
        last_popped = candidate.task.clone();

        let diff = candidate.gamma.symmetric_difference(&robot_gamma);
        if closed.contains(&candidate.gamma) {
            run.metrics().increment_closed_hits();
            run.record(candidate.depth(), &diff, TraceOutcome::PrunedClosed);
            continue;
        }
        if contains_bad_diff(&diff, &bad_diffs) {
            run.metrics().increment_monotone_prunes();
            run.record(candidate.depth(), &diff, TraceOutcome::PrunedMonotone);
            continue;
        }

        run.begin_evaluation()?;
        let optimal_plan = run.plan_for(&candidate.task);
        if !keeps_plan(explained_plan, &candidate.task, optimal_plan.as_ref()) {
            run.metrics().increment_invalid();
            run.record(candidate.depth(), &diff, TraceOutcome::Invalid);
            bad_diffs.push(diff);
            continue;
        }

        closed.insert(candidate.gamma.clone());
        run.metrics().increment_expanded();
        run.record(candidate.depth(), &diff, TraceOutcome::Expanded);

        for edit in edits_toward(&candidate.gamma, &human_gamma) {
            let child = run.child(&candidate, edit)?;
            if closed.contains(&child.gamma) {
                run.metrics().increment_closed_hits();
                continue;
            }
            let child_diff = child.gamma.symmetric_difference(&robot_gamma);
            if contains_bad_diff(&child_diff, &bad_diffs) {
                run.metrics().increment_monotone_prunes();
                run.record(child.depth(), &child_diff, TraceOutcome::PrunedMonotone);
                continue;
            }
            frontier.push(child, cost + 1);
        }

        if candidate.depth() > best.0.len() {
            best = (candidate.edits, candidate.task);
        }
    }

    Ok(best)
}

/// The explained plan is applicable and no longer than the optimal plan
fn keeps_plan(explained_plan: &Plan, task: &Task, optimal_plan: Option<&Plan>) -> bool {
    match optimal_plan {
        Some(optimal) => is_applicable(explained_plan, task) && explained_plan.len() <= optimal.len(),
        None => false,
    }
}

/// A diff that contains a known-invalid diff cannot become valid again
fn contains_bad_diff(diff: &Gamma, bad_diffs: &[Gamma]) -> bool {
    bad_diffs.iter().any(|bad| bad.is_subset(diff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::SearchMetrics;
    use crate::planner::BreadthFirstPlanner;
    use crate::reconcile::config::ReconcileConfig;
    use crate::task::{state, Operator, State};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn robot() -> Task {
        Task::new(
            "robot",
            State::new(),
            State::new(),
            state(["q"]),
            vec![Operator::new("a", Vec::<&str>::new(), ["q"], Vec::new())],
        )
    }

    /// Differs from the robot by an extra initial fact and a precondition
    /// the explained plan cannot satisfy
    fn human() -> Task {
        Task::new(
            "human",
            State::new(),
            state(["x"]),
            state(["q"]),
            vec![Operator::new("a", ["p"], ["q"], Vec::<&str>::new())],
        )
    }

    #[test]
    fn test_contains_bad_diff() {
        let bad = vec![Gamma::from_meta_strings(["init-has-p"])];
        let wider = Gamma::from_meta_strings(["init-has-p", "goal-has-q"]);
        let other = Gamma::from_meta_strings(["goal-has-q"]);
        assert!(contains_bad_diff(&wider, &bad));
        assert!(!contains_bad_diff(&other, &bad));
        assert!(contains_bad_diff(&other, &[Gamma::new()]));
    }

    #[test]
    fn test_keeps_plan() {
        let plan = Plan::new(vec![Operator::new("a", Vec::<&str>::new(), ["q"], Vec::new())]);
        let task = robot();
        assert!(keeps_plan(&plan, &task, Some(&plan)));
        assert!(!keeps_plan(&plan, &task, None));
        assert!(!keeps_plan(&plan, &task, Some(&Plan::empty())));
        assert!(!keeps_plan(&plan, &human(), Some(&plan)));
    }

    #[test]
    fn test_superset_of_invalid_diff_never_evaluated() {
        let robot = robot();
        let human = human();
        let planner = BreadthFirstPlanner::new();
        let plan = Plan::new(robot.operators().to_vec());

        for seed in 0..8 {
            let config = ReconcileConfig::default().with_trace();
            let metrics = SearchMetrics::new();
            let mut run = SearchRun::new(&planner, None, &config, &metrics).unwrap();
            let mut frontier =
                Frontier::new(&planner, None, &plan, &metrics, StdRng::seed_from_u64(seed));
            let (edits, _) = search(&mut run, &mut frontier, &plan, &robot, &human).unwrap();
            assert_eq!(edits.names(), vec!["add-init-has-x"]);

            let both = Gamma::from_meta_strings(["init-has-x", "a-has-precondition-p"]);
            let explanation = run.finish(
                crate::reconcile::Algorithm::Mme,
                &plan,
                edits,
                robot.clone(),
            );
            let trace = explanation.trace.unwrap();
            assert!(trace
                .events()
                .iter()
                .filter(|e| e.outcome.is_evaluated())
                .all(|e| e.diff != both));
            assert_eq!(trace.with_outcome(TraceOutcome::Invalid).count(), 1);
            assert_eq!(explanation.metrics.monotone_prunes, 1);
        }
    }
}
