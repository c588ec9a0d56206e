//! External planner boundary
//!
//! Reconciliation consults a classical planner only through [`Planner`]:
//! given a model it returns an optimal plan, or `None` when the model has no
//! solution. Plans are unit-cost, so plan length is the optimality metric.
//!
//! # Provided implementations
//!
//! - [`BreadthFirstPlanner`]: blind breadth-first search, optimal for unit
//!   costs; its heuristic form runs [`astar_search`]
//! - [`BlindHeuristic`] and [`HMaxHeuristic`], both admissible, so A* with
//!   either stays optimal

mod astar;
mod breadth_first;
mod heuristics;

pub use astar::astar_search;
pub use breadth_first::BreadthFirstPlanner;
pub use heuristics::{BlindHeuristic, HMaxHeuristic};

use crate::task::{Plan, State, Task};

/// Estimates remaining plan length
pub trait Heuristic {
    /// Remaining length from `state`, or `None` if no goal state is reachable.
    ///
    /// Must never overestimate for the planner's result to stay optimal.
    fn estimate(&self, task: &Task, state: &State) -> Option<u32>;
}

/// Optimal classical planner
pub trait Planner {
    /// Returns an optimal plan for `task`, or `None` if it is unsolvable
    fn search(&self, task: &Task) -> Option<Plan>;

    /// Same as [`Planner::search`], guided by an admissible heuristic
    fn search_with(&self, task: &Task, heuristic: &dyn Heuristic) -> Option<Plan>;
}

impl<P: Planner + ?Sized> Planner for &P {
    fn search(&self, task: &Task) -> Option<Plan> {
        (**self).search(task)
    }

    fn search_with(&self, task: &Task, heuristic: &dyn Heuristic) -> Option<Plan> {
        (**self).search_with(task, heuristic)
    }
}

/// Dispatches to the heuristic form when a heuristic is supplied
pub fn search_plan(
    planner: &dyn Planner,
    heuristic: Option<&dyn Heuristic>,
    task: &Task,
) -> Option<Plan> {
    match heuristic {
        Some(h) => planner.search_with(task, h),
        None => planner.search(task),
    }
}
