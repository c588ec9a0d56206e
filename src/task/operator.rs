//! STRIPS operators
//!
//! An operator is applicable in a state when its preconditions are a subset
//! of the state. Applying it removes the delete effects and then adds the
//! add effects, so a fact in both effect sets ends up true.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{TaskError, TaskResult};
use super::fact::{Fact, State};

/// Immutable STRIPS operator
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Operator {
    name: String,
    preconditions: State,
    add_effects: State,
    del_effects: State,
    /// Uncertain preconditions, carried but never read by reconciliation
    #[serde(default)]
    possible_preconditions: State,
    #[serde(default)]
    possible_add: State,
    #[serde(default)]
    possible_del: State,
}

impl Operator {
    /// Creates an operator with empty possible-effect sets
    pub fn new<P, A, D, F>(name: impl Into<String>, preconditions: P, add_effects: A, del_effects: D) -> Self
    where
        P: IntoIterator<Item = F>,
        A: IntoIterator<Item = F>,
        D: IntoIterator<Item = F>,
        F: Into<Fact>,
    {
        Self {
            name: name.into(),
            preconditions: preconditions.into_iter().map(Into::into).collect(),
            add_effects: add_effects.into_iter().map(Into::into).collect(),
            del_effects: del_effects.into_iter().map(Into::into).collect(),
            possible_preconditions: State::new(),
            possible_add: State::new(),
            possible_del: State::new(),
        }
    }

    /// Returns a copy carrying the given possible-effect sets
    pub fn with_possible(mut self, preconditions: State, add: State, del: State) -> Self {
        self.possible_preconditions = preconditions;
        self.possible_add = add;
        self.possible_del = del;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &State {
        &self.preconditions
    }

    pub fn add_effects(&self) -> &State {
        &self.add_effects
    }

    pub fn del_effects(&self) -> &State {
        &self.del_effects
    }

    pub fn possible_preconditions(&self) -> &State {
        &self.possible_preconditions
    }

    pub fn possible_add(&self) -> &State {
        &self.possible_add
    }

    pub fn possible_del(&self) -> &State {
        &self.possible_del
    }

    /// True if the fact appears in the preconditions or either effect set
    pub fn mentions(&self, fact: &Fact) -> bool {
        self.preconditions.contains(fact)
            || self.add_effects.contains(fact)
            || self.del_effects.contains(fact)
    }

    /// Checks whether all preconditions hold in `state`
    pub fn applicable(&self, state: &State) -> bool {
        self.preconditions.is_subset(state)
    }

    /// Applies the operator, failing if a precondition is missing.
    pub fn apply(&self, state: &State) -> TaskResult<State> {
        if !self.applicable(state) {
            return Err(TaskError::inapplicable_operator(
                &self.name,
                self.preconditions.difference(state),
            ));
        }
        Ok(self.apply_unchecked(state))
    }

    /// Applies the operator without checking preconditions.
    ///
    /// Callers must have checked `applicable` first.
    pub(crate) fn apply_unchecked(&self, state: &State) -> State {
        let mut next: State = state.difference(&self.del_effects).cloned().collect();
        next.extend(self.add_effects.iter().cloned());
        next
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for (group, facts) in [
            ("PRE", &self.preconditions),
            ("ADD", &self.add_effects),
            ("DEL", &self.del_effects),
            ("PRE~", &self.possible_preconditions),
            ("ADD~", &self.possible_add),
            ("DEL~", &self.possible_del),
        ] {
            for fact in facts {
                writeln!(f, "  {}: {}", group, fact)?;
            }
        }
        Ok(())
    }
}
