//! Decoding Γ-encodings back into tasks
//!
//! Every decoded task gets a fresh integer name from the context's counter.
//! The counter is owned by the caller (one per search run), so concurrent
//! runs never share naming state.

use std::collections::BTreeMap;

use super::fact::State;
use super::gamma::{Gamma, MetaFact};
use super::operator::Operator;
use super::task::Task;

#[derive(Default)]
struct OperatorParts {
    preconditions: State,
    add_effects: State,
    del_effects: State,
}

/// Naming context for decoded tasks
#[derive(Debug, Clone, Default)]
pub struct DecodeContext {
    last_name: u64,
}

impl DecodeContext {
    /// Creates a context whose first decoded task is named `1`
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that continues after `last_name`
    pub fn starting_after(last_name: u64) -> Self {
        Self { last_name }
    }

    /// Number of the most recently assigned name (0 if none yet)
    pub fn last_name(&self) -> u64 {
        self.last_name
    }

    /// Rebuilds a task from its encoding.
    ///
    /// Operators are keyed by name and come back sorted by name, with empty
    /// possible-effect sets. An operator whose precondition and effect sets
    /// are all empty has no meta-facts and therefore does not reappear.
    pub fn decode(&mut self, gamma: &Gamma) -> Task {
        let mut facts = State::new();
        let mut initial_state = State::new();
        let mut goals = State::new();
        let mut operators: BTreeMap<&str, OperatorParts> = BTreeMap::new();

        for meta in gamma {
            facts.insert(meta.fact().clone());
            match meta {
                MetaFact::InitHas(fact) => {
                    initial_state.insert(fact.clone());
                }
                MetaFact::GoalHas(fact) => {
                    goals.insert(fact.clone());
                }
                MetaFact::Precondition { operator, fact } => {
                    operators
                        .entry(operator.as_str())
                        .or_default()
                        .preconditions
                        .insert(fact.clone());
                }
                MetaFact::AddEffect { operator, fact } => {
                    operators
                        .entry(operator.as_str())
                        .or_default()
                        .add_effects
                        .insert(fact.clone());
                }
                MetaFact::DelEffect { operator, fact } => {
                    operators
                        .entry(operator.as_str())
                        .or_default()
                        .del_effects
                        .insert(fact.clone());
                }
            }
        }

        let operators = operators
            .into_iter()
            .map(|(name, parts)| {
                Operator::new(name, parts.preconditions, parts.add_effects, parts.del_effects)
            })
            .collect();

        self.last_name += 1;
        Task::new(self.last_name.to_string(), facts, initial_state, goals, operators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::fact::state;

    fn sample() -> Task {
        Task::new(
            "sample",
            State::new(),
            state(["p"]),
            state(["q"]),
            vec![
                Operator::new("b", ["q"], ["r"], Vec::<&str>::new()),
                Operator::new("a", ["p"], ["q"], ["p"]),
            ],
        )
    }

    #[test]
    fn test_decode_reconstructs_memberships() {
        let task = sample();
        let mut ctx = DecodeContext::new();
        let decoded = ctx.decode(&task.gamma());

        assert_eq!(decoded.initial_state(), task.initial_state());
        assert_eq!(decoded.goals(), task.goals());
        for op in task.operators() {
            let back = decoded.operator(op.name()).unwrap();
            assert_eq!(back.preconditions(), op.preconditions());
            assert_eq!(back.add_effects(), op.add_effects());
            assert_eq!(back.del_effects(), op.del_effects());
        }
    }

    #[test]
    fn test_decode_names_are_fresh() {
        let gamma = sample().gamma();
        let mut ctx = DecodeContext::new();
        assert_eq!(ctx.decode(&gamma).name(), "1");
        assert_eq!(ctx.decode(&gamma).name(), "2");
        assert_eq!(ctx.last_name(), 2);

        let mut other = DecodeContext::starting_after(41);
        assert_eq!(other.decode(&gamma).name(), "42");
    }

    #[test]
    fn test_decode_drops_possible_effects() {
        let op = Operator::new("a", ["p"], ["q"], Vec::<&str>::new())
            .with_possible(state(["r"]), state(["s"]), State::new());
        let task = Task::new("t", State::new(), state(["p"]), state(["q"]), vec![op]);
        let decoded = DecodeContext::new().decode(&task.gamma());
        let back = decoded.operator("a").unwrap();
        assert!(back.possible_preconditions().is_empty());
        assert!(back.possible_add().is_empty());
    }

    #[test]
    fn test_decode_orders_operators_by_name() {
        let decoded = DecodeContext::new().decode(&sample().gamma());
        let names: Vec<&str> = decoded.operators().iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
