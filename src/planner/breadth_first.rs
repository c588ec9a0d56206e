//! Breadth-first planner
//!
//! Expands states in order of depth, so the first goal state found is at
//! minimal depth and the reconstructed plan is optimal for unit costs.

use std::collections::{HashSet, VecDeque};

use super::astar::{astar_search, reconstruct};
use super::{Heuristic, Planner};
use crate::task::{Plan, State, Task};

/// Optimal blind planner
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstPlanner;

impl BreadthFirstPlanner {
    pub fn new() -> Self {
        Self
    }
}

impl Planner for BreadthFirstPlanner {
    fn search(&self, task: &Task) -> Option<Plan> {
        let root = task.initial_state().clone();
        if task.goal_reached(&root) {
            return Some(Plan::empty());
        }

        // Arena of (state, parent index, operator index)
        let mut nodes: Vec<(State, Option<(usize, usize)>)> = vec![(root.clone(), None)];
        let mut seen: HashSet<State> = HashSet::from([root]);
        let mut queue: VecDeque<usize> = VecDeque::from([0]);

        while let Some(current) = queue.pop_front() {
            for (op_index, op) in task.operators().iter().enumerate() {
                let state = &nodes[current].0;
                if !op.applicable(state) {
                    continue;
                }
                let next = op.apply_unchecked(state);
                if !seen.insert(next.clone()) {
                    continue;
                }
                let reached = task.goal_reached(&next);
                nodes.push((next, Some((current, op_index))));
                if reached {
                    return Some(reconstruct(task, &nodes, nodes.len() - 1));
                }
                queue.push_back(nodes.len() - 1);
            }
        }
        None
    }

    fn search_with(&self, task: &Task, heuristic: &dyn Heuristic) -> Option<Plan> {
        astar_search(task, heuristic)
    }
}
