//! Plans and plan checks
//!
//! A plan is an ordered sequence of operators. When a plan is checked
//! against a model, each step is resolved by operator name in that model,
//! so edits to a model's operators change whether the plan still works.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{TaskError, TaskResult};
use super::fact::State;
use super::operator::Operator;
use super::task::Task;

/// An ordered sequence of unit-cost operator applications
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan(Vec<Operator>);

impl Plan {
    pub fn new(steps: Vec<Operator>) -> Self {
        Self(steps)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Plan length, the optimality metric
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[Operator] {
        &self.0
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.0.iter().map(Operator::name).collect()
    }

    /// Distinct operators used by the plan
    pub fn distinct_operators(&self) -> BTreeSet<&Operator> {
        self.0.iter().collect()
    }

    /// Runs the plan in `task` from its initial state.
    ///
    /// Fails on the first step whose operator `task` lacks or whose
    /// preconditions do not hold.
    pub fn execute(&self, task: &Task) -> TaskResult<State> {
        let mut state = task.initial_state().clone();
        for step in &self.0 {
            let op = task
                .operator(step.name())
                .ok_or_else(|| TaskError::unknown_operator(step.name()))?;
            state = op.apply(&state)?;
        }
        Ok(state)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.step_names().join(", "))
    }
}

/// True if every step of `plan` applies in sequence from `task`'s initial state
pub fn is_applicable(plan: &Plan, task: &Task) -> bool {
    plan.execute(task).is_ok()
}

/// True if `plan` solves `task` and is as short as `optimal_plan`.
///
/// `optimal_plan` is the planner's result for `task`; `None` means the task
/// is unsolvable, in which case no plan is optimal.
pub fn is_optimal(plan: &Plan, task: &Task, optimal_plan: Option<&Plan>) -> bool {
    match plan.execute(task) {
        Ok(end) => {
            task.goal_reached(&end) && optimal_plan.is_some_and(|opt| opt.len() == plan.len())
        }
        Err(_) => false,
    }
}
