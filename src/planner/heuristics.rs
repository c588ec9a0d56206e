//! Admissible heuristics

use std::collections::HashMap;

use super::Heuristic;
use crate::task::{Fact, State, Task};

/// 0 in goal states, 1 elsewhere
#[derive(Debug, Clone, Copy, Default)]
pub struct BlindHeuristic;

impl Heuristic for BlindHeuristic {
    fn estimate(&self, task: &Task, state: &State) -> Option<u32> {
        Some(if task.goal_reached(state) { 0 } else { 1 })
    }
}

/// The h_max heuristic.
///
/// The cost of a fact is 0 if it holds, otherwise one more than the cheapest
/// operator achieving it, where an operator costs the maximum of its
/// precondition costs. The estimate is the maximum goal cost. Returns `None`
/// when some goal is unreachable even with deletes ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct HMaxHeuristic;

impl Heuristic for HMaxHeuristic {
    fn estimate(&self, task: &Task, state: &State) -> Option<u32> {
        let mut cost: HashMap<&Fact, u32> = state.iter().map(|f| (f, 0)).collect();

        loop {
            let mut changed = false;
            for op in task.operators() {
                let pre_cost = op
                    .preconditions()
                    .iter()
                    .map(|f| cost.get(f).copied())
                    .try_fold(0u32, |acc, c| c.map(|c| acc.max(c)));
                let Some(pre_cost) = pre_cost else {
                    continue;
                };
                for fact in op.add_effects() {
                    let candidate = pre_cost + 1;
                    if cost.get(fact).map_or(true, |&c| candidate < c) {
                        cost.insert(fact, candidate);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        task.goals()
            .iter()
            .map(|g| cost.get(g).copied())
            .try_fold(0u32, |acc, c| c.map(|c| acc.max(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{state, Operator};

    fn chain() -> Task {
        Task::new(
            "chain",
            State::new(),
            state(["a"]),
            state(["c"]),
            vec![
                Operator::new("ab", ["a"], ["b"], ["a"]),
                Operator::new("bc", ["b"], ["c"], Vec::<&str>::new()),
            ],
        )
    }

    #[test]
    fn test_blind() {
        let task = chain();
        assert_eq!(BlindHeuristic.estimate(&task, &state(["a"])), Some(1));
        assert_eq!(BlindHeuristic.estimate(&task, &state(["c"])), Some(0));
    }

    #[test]
    fn test_hmax_chain() {
        let task = chain();
        assert_eq!(HMaxHeuristic.estimate(&task, &state(["a"])), Some(2));
        assert_eq!(HMaxHeuristic.estimate(&task, &state(["b"])), Some(1));
        assert_eq!(HMaxHeuristic.estimate(&task, &state(["c"])), Some(0));
    }

    #[test]
    fn test_hmax_dead_end() {
        let task = chain();
        assert_eq!(HMaxHeuristic.estimate(&task, &state(["z"])), None);
    }
}
