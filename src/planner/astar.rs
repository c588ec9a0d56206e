//! A* search over task states
//!
//! Optimal whenever the heuristic is admissible. Nodes are re-opened when a
//! cheaper path to a known state is found, so consistency is not required.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::Heuristic;
use crate::task::{Plan, State, Task};

/// Walks parent links back from `leaf` and returns the plan
pub(super) fn reconstruct(
    task: &Task,
    nodes: &[(State, Option<(usize, usize)>)],
    leaf: usize,
) -> Plan {
    let mut steps = Vec::new();
    let mut cursor = leaf;
    while let Some((parent, op_index)) = nodes[cursor].1 {
        steps.push(task.operators()[op_index].clone());
        cursor = parent;
    }
    steps.reverse();
    Plan::new(steps)
}

/// Runs A* with `heuristic`, returning an optimal plan or `None`
pub fn astar_search(task: &Task, heuristic: &dyn Heuristic) -> Option<Plan> {
    let root = task.initial_state().clone();
    let root_h = heuristic.estimate(task, &root)?;

    let mut nodes: Vec<(State, Option<(usize, usize)>)> = vec![(root.clone(), None)];
    let mut best_g: HashMap<State, u32> = HashMap::from([(root, 0)]);
    // (f, h, insertion order, g, node index); ties favour lower h, then older nodes
    let mut open: BinaryHeap<Reverse<(u32, u32, u64, u32, usize)>> = BinaryHeap::new();
    let mut counter: u64 = 0;
    open.push(Reverse((root_h, root_h, counter, 0, 0)));

    while let Some(Reverse((_, _, _, g, index))) = open.pop() {
        let state = nodes[index].0.clone();
        if best_g.get(&state).is_some_and(|&best| best < g) {
            continue;
        }
        if task.goal_reached(&state) {
            return Some(reconstruct(task, &nodes, index));
        }

        for (op_index, op) in task.operators().iter().enumerate() {
            if !op.applicable(&state) {
                continue;
            }
            let next = op.apply_unchecked(&state);
            let next_g = g + 1;
            if best_g.get(&next).is_some_and(|&best| best <= next_g) {
                continue;
            }
            let Some(h) = heuristic.estimate(task, &next) else {
                continue;
            };
            best_g.insert(next.clone(), next_g);
            nodes.push((next, Some((index, op_index))));
            counter += 1;
            open.push(Reverse((next_g + h, h, counter, next_g, nodes.len() - 1)));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{BlindHeuristic, HMaxHeuristic};
    use crate::task::{state, Operator};

    fn detour() -> Task {
        Task::new(
            "detour",
            State::new(),
            state(["s"]),
            state(["g"]),
            vec![
                Operator::new("s1", ["s"], ["x1"], Vec::<&str>::new()),
                Operator::new("x1x2", ["x1"], ["x2"], Vec::new()),
                Operator::new("x2g", ["x2"], ["g"], Vec::new()),
                Operator::new("s-y", ["s"], ["y"], Vec::new()),
                Operator::new("yg", ["y"], ["g"], Vec::new()),
            ],
        )
    }

    #[test]
    fn test_astar_optimal_blind() {
        let plan = astar_search(&detour(), &BlindHeuristic).unwrap();
        assert_eq!(plan.step_names(), vec!["s-y", "yg"]);
    }

    #[test]
    fn test_astar_optimal_hmax() {
        let plan = astar_search(&detour(), &HMaxHeuristic).unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_astar_dead_end_root() {
        let task = Task::new("t", State::new(), state(["a"]), state(["z"]), vec![]);
        assert!(astar_search(&task, &HMaxHeuristic).is_none());
    }
}
