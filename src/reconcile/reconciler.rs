//! Entry point for MCE and MME runs

use rand::Rng;

use super::config::ReconcileConfig;
use super::errors::{ReconcileError, ReconcileResult};
use super::explanation::{Algorithm, Explanation};
use super::frontier::Frontier;
use super::run::SearchRun;
use super::{mce, mme};
use crate::observability::{log_event_at, Event, ObservationScope, SearchMetrics};
use crate::planner::{Heuristic, Planner};
use crate::task::{Plan, Task};

/// Runs model reconciliation searches against one planner.
///
/// Each call is an independent run with its own frontier, closed sets,
/// decode counter, metrics and random source.
pub struct Reconciler<'a> {
    planner: &'a dyn Planner,
    heuristic: Option<&'a dyn Heuristic>,
    config: ReconcileConfig,
}

impl<'a> Reconciler<'a> {
    pub fn new(planner: &'a dyn Planner) -> Self {
        Self {
            planner,
            heuristic: None,
            config: ReconcileConfig::default(),
        }
    }

    /// Routes every planner call through the heuristic form
    pub fn with_heuristic(mut self, heuristic: &'a dyn Heuristic) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    pub fn with_config(mut self, config: ReconcileConfig) -> ReconcileResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Shortest edits from `human` toward `robot` that make
    /// `explained_plan` optimal
    pub fn mce(&self, explained_plan: &Plan, robot: &Task, human: &Task) -> ReconcileResult<Explanation> {
        self.mce_with_rng(explained_plan, robot, human, self.config.rng())
    }

    pub fn mce_with_rng<R: Rng>(
        &self,
        explained_plan: &Plan,
        robot: &Task,
        human: &Task,
        rng: R,
    ) -> ReconcileResult<Explanation> {
        self.run(Algorithm::Mce, explained_plan, robot, human, rng)
    }

    /// Longest monotone edits from `robot` toward `human` that keep
    /// `explained_plan` valid
    pub fn mme(&self, explained_plan: &Plan, robot: &Task, human: &Task) -> ReconcileResult<Explanation> {
        self.mme_with_rng(explained_plan, robot, human, self.config.rng())
    }

    pub fn mme_with_rng<R: Rng>(
        &self,
        explained_plan: &Plan,
        robot: &Task,
        human: &Task,
        rng: R,
    ) -> ReconcileResult<Explanation> {
        self.run(Algorithm::Mme, explained_plan, robot, human, rng)
    }

    fn run<R: Rng>(
        &self,
        algorithm: Algorithm,
        explained_plan: &Plan,
        robot: &Task,
        human: &Task,
        rng: R,
    ) -> ReconcileResult<Explanation> {
        let metrics = SearchMetrics::new();
        let mut run = SearchRun::new(self.planner, self.heuristic, &self.config, &metrics)?;
        let mut frontier = Frontier::new(self.planner, self.heuristic, explained_plan, &metrics, rng);

        let run_id = run.run_id().to_string();
        let scope = ObservationScope::with_min_severity(
            algorithm.scope_name(),
            &[("run_id", &run_id)],
            run.min_severity(),
        );
        run.log(
            Event::SearchBegin,
            &[
                ("algorithm", algorithm.as_str()),
                ("human_model_size", &human.gamma().len().to_string()),
                ("plan_length", &explained_plan.len().to_string()),
                ("robot_model_size", &robot.gamma().len().to_string()),
                ("run_id", &run_id),
            ],
        );

        let outcome = match algorithm {
            Algorithm::Mce => mce::search(&mut run, &mut frontier, explained_plan, robot, human),
            Algorithm::Mme => mme::search(&mut run, &mut frontier, explained_plan, robot, human),
        };

        let min_severity = run.min_severity();
        match outcome {
            Ok((edits, model)) => {
                let explanation = run.finish(algorithm, explained_plan, edits, model);
                let edit_count = explanation.edits.len().to_string();
                let evaluated = explanation.metrics.nodes_evaluated.to_string();
                log_event_at(
                    min_severity,
                    Event::SearchComplete,
                    &[
                        ("algorithm", algorithm.as_str()),
                        ("edits", &edit_count),
                        ("elapsed_ms", &explanation.elapsed_ms.to_string()),
                        ("evaluated", &evaluated),
                        ("run_id", &run_id),
                    ],
                );
                scope.complete_with_fields(&[("edits", &edit_count)]);
                Ok(explanation)
            }
            Err(err) => {
                if matches!(err, ReconcileError::FrontierExhausted) {
                    log_event_at(min_severity, Event::FrontierExhausted, &[("run_id", &run_id)]);
                }
                if err.is_fatal() {
                    scope.fail_fatal(err.code());
                } else {
                    scope.fail(err.code());
                }
                Err(err)
            }
        }
    }
}

/// MCE with the default configuration
pub fn mce_search(
    planner: &dyn Planner,
    heuristic: Option<&dyn Heuristic>,
    explained_plan: &Plan,
    robot: &Task,
    human: &Task,
) -> ReconcileResult<Explanation> {
    let reconciler = Reconciler::new(planner);
    match heuristic {
        Some(h) => reconciler.with_heuristic(h).mce(explained_plan, robot, human),
        None => reconciler.mce(explained_plan, robot, human),
    }
}

/// MME with the default configuration
pub fn mme_search(
    planner: &dyn Planner,
    heuristic: Option<&dyn Heuristic>,
    explained_plan: &Plan,
    robot: &Task,
    human: &Task,
) -> ReconcileResult<Explanation> {
    let reconciler = Reconciler::new(planner);
    match heuristic {
        Some(h) => reconciler.with_heuristic(h).mme(explained_plan, robot, human),
        None => reconciler.mme(explained_plan, robot, human),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{BreadthFirstPlanner, HMaxHeuristic};
    use crate::task::{state, Operator, State};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn robot() -> Task {
        Task::new(
            "robot",
            State::new(),
            State::new(),
            state(["q"]),
            vec![
                Operator::new("a", ["p"], ["q"], Vec::<&str>::new()),
                Operator::new("b", Vec::<&str>::new(), ["p"], Vec::new()),
            ],
        )
    }

    fn human() -> Task {
        Task::new(
            "human",
            State::new(),
            State::new(),
            state(["q"]),
            vec![
                Operator::new("a", Vec::<&str>::new(), ["q"], Vec::new()),
                Operator::new("b", Vec::<&str>::new(), ["p"], Vec::new()),
            ],
        )
    }

    fn explained() -> Plan {
        let robot = robot();
        Plan::new(vec![
            robot.operator("b").unwrap().clone(),
            robot.operator("a").unwrap().clone(),
        ])
    }

    #[test]
    fn test_mce_explanation_report() {
        let planner = BreadthFirstPlanner::new();
        let reconciler = Reconciler::new(&planner)
            .with_config(ReconcileConfig::default().with_seed(1).with_trace())
            .unwrap();
        let explanation = reconciler.mce(&explained(), &robot(), &human()).unwrap();

        assert_eq!(explanation.algorithm, Algorithm::Mce);
        assert_eq!(explanation.edits.names(), vec!["add-a-has-precondition-p"]);
        assert_eq!(explanation.plan, explained());
        assert_eq!(explanation.metrics.nodes_evaluated, 2);
        assert!(explanation.trace.is_some());
    }

    #[test]
    fn test_heuristic_form_agrees() {
        let planner = BreadthFirstPlanner::new();
        let blind = mce_search(&planner, None, &explained(), &robot(), &human()).unwrap();
        let guided =
            mce_search(&planner, Some(&HMaxHeuristic), &explained(), &robot(), &human()).unwrap();
        assert_eq!(blind.edits, guided.edits);
    }

    #[test]
    fn test_mme_keeps_valid_edits_only() {
        let planner = BreadthFirstPlanner::new();
        let explanation = Reconciler::new(&planner)
            .mme_with_rng(&explained(), &robot(), &human(), StdRng::seed_from_u64(2))
            .unwrap();
        // dropping a's precondition lets a one-step plan beat the explained one
        assert!(explanation.edits.is_empty());
        assert_eq!(explanation.metrics.invalid_candidates, 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let planner = BreadthFirstPlanner::new();
        let config = ReconcileConfig {
            log_level: "verbose".to_string(),
            ..ReconcileConfig::default()
        };
        assert!(Reconciler::new(&planner).with_config(config).is_err());
    }

    #[test]
    fn test_exhausted_frontier_is_fatal() {
        // The explained plan is not optimal even in the robot model.
        let planner = BreadthFirstPlanner::new();
        let robot = robot();
        let padded = Plan::new(vec![
            robot.operator("b").unwrap().clone(),
            robot.operator("b").unwrap().clone(),
            robot.operator("a").unwrap().clone(),
        ]);
        let err = mce_search(&planner, None, &padded, &robot, &human()).unwrap_err();
        assert!(matches!(err, ReconcileError::FrontierExhausted));
        assert!(err.is_fatal());
    }
}
