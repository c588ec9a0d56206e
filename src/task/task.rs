//! STRIPS planning tasks
//!
//! A task is immutable once built. Search never mutates a task in place;
//! every candidate model is a fresh task produced by decoding an encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fact::{Fact, State};
use super::gamma::{Gamma, MetaFact};
use super::operator::Operator;

/// A STRIPS planning task (a model)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    name: String,
    facts: State,
    initial_state: State,
    goals: State,
    operators: Vec<Operator>,
}

impl Task {
    /// Creates a task.
    ///
    /// The fact vocabulary is widened to include every fact mentioned by the
    /// initial state, goal and operators.
    pub fn new(
        name: impl Into<String>,
        facts: State,
        initial_state: State,
        goals: State,
        operators: Vec<Operator>,
    ) -> Self {
        let mut task = Self {
            name: name.into(),
            facts,
            initial_state,
            goals,
            operators,
        };
        let used = task.used_facts();
        task.facts.extend(used);
        task
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facts(&self) -> &State {
        &self.facts
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn goals(&self) -> &State {
        &self.goals
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Looks up an operator by name
    pub fn operator(&self, name: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.name() == name)
    }

    /// True if every goal fact holds in `state`
    pub fn goal_reached(&self, state: &State) -> bool {
        self.goals.is_subset(state)
    }

    /// Returns `(operator, successor)` pairs for every applicable operator
    pub fn successors(&self, state: &State) -> Vec<(&Operator, State)> {
        self.operators
            .iter()
            .filter(|op| op.applicable(state))
            .map(|op| (op, op.apply_unchecked(state)))
            .collect()
    }

    /// Facts that appear anywhere in the model's initial state, goal or
    /// operator preconditions and effects.
    pub fn used_facts(&self) -> State {
        let mut used: State = self.initial_state.union(&self.goals).cloned().collect();
        for op in &self.operators {
            used.extend(op.preconditions().iter().cloned());
            used.extend(op.add_effects().iter().cloned());
            used.extend(op.del_effects().iter().cloned());
        }
        used
    }

    /// Projects the task into its meta-fact encoding
    pub fn gamma(&self) -> Gamma {
        Gamma::encode(self)
    }

    /// Builds the meta-level task from `self` to `other`.
    ///
    /// Its facts are every meta-fact over the union of both vocabularies and
    /// both operator sets; it starts at Γ(self), its goal is Γ(other), and it
    /// has no operators of its own. Edits supply the meta-operators.
    pub fn meta_task(&self, other: &Task) -> Task {
        let mut op_names: Vec<&str> = self
            .operators
            .iter()
            .chain(other.operators.iter())
            .map(Operator::name)
            .collect();
        op_names.sort_unstable();
        op_names.dedup();

        let mut facts = State::new();
        for fact in self.facts.union(&other.facts) {
            facts.insert(MetaFact::InitHas(fact.clone()).to_fact());
            facts.insert(MetaFact::GoalHas(fact.clone()).to_fact());
            for name in &op_names {
                for meta in MetaFact::operator_templates(name, fact) {
                    facts.insert(meta.to_fact());
                }
            }
        }

        Task::new(
            format!("meta-{}-to-{}", self.name, other.name),
            facts,
            self.gamma().to_state(),
            other.gamma().to_state(),
            Vec::new(),
        )
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |s: &State| s.iter().map(Fact::as_str).collect::<Vec<_>>().join(", ");
        writeln!(f, "Task {}", self.name)?;
        writeln!(f, "  Vars:  {}", join(&self.facts))?;
        writeln!(f, "  Init:  {}", join(&self.initial_state))?;
        writeln!(f, "  Goals: {}", join(&self.goals))?;
        write!(f, "  Ops:   ")?;
        for op in &self.operators {
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::fact::state;

    fn two_step() -> Task {
        Task::new(
            "two-step",
            State::new(),
            state(["at-a"]),
            state(["at-c"]),
            vec![
                Operator::new("a-to-b", ["at-a"], ["at-b"], ["at-a"]),
                Operator::new("b-to-c", ["at-b"], ["at-c"], ["at-b"]),
            ],
        )
    }

    #[test]
    fn test_vocabulary_widened() {
        let task = two_step();
        assert_eq!(task.facts(), &state(["at-a", "at-b", "at-c"]));
    }

    #[test]
    fn test_used_facts_ignore_declared_vocabulary() {
        let task = Task::new(
            "declared",
            state(["spare"]),
            state(["at-a"]),
            state(["at-b"]),
            vec![Operator::new("a-to-b", ["at-a"], ["at-b"], ["at-a"])],
        );
        assert_eq!(task.used_facts(), state(["at-a", "at-b"]));
        assert!(task.facts().contains(&Fact::new("spare")));
    }

    #[test]
    fn test_successors_only_applicable() {
        let task = two_step();
        let succ = task.successors(task.initial_state());
        assert_eq!(succ.len(), 1);
        assert_eq!(succ[0].0.name(), "a-to-b");
        assert_eq!(succ[0].1, state(["at-b"]));
    }

    #[test]
    fn test_goal_reached() {
        let task = two_step();
        assert!(!task.goal_reached(task.initial_state()));
        assert!(task.goal_reached(&state(["at-c", "at-a"])));
    }

    #[test]
    fn test_operator_lookup() {
        let task = two_step();
        assert!(task.operator("b-to-c").is_some());
        assert!(task.operator("c-to-d").is_none());
    }

    #[test]
    fn test_meta_task_endpoints() {
        let m_r = two_step();
        let m_h = Task::new(
            "human",
            State::new(),
            state(["at-a"]),
            state(["at-c"]),
            vec![Operator::new("a-to-b", Vec::<&str>::new(), ["at-b"], ["at-a"])],
        );
        let meta = m_h.meta_task(&m_r);
        assert_eq!(meta.name(), "meta-human-to-two-step");
        assert_eq!(meta.initial_state(), &m_h.gamma().to_state());
        assert_eq!(meta.goals(), &m_r.gamma().to_state());
        assert!(meta.operators().is_empty());
        // 3 facts x (init, goal, 2 operators x 3 templates)
        assert_eq!(meta.facts().len(), 3 * (2 + 2 * 3));
    }
}
