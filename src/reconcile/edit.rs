//! Model edits
//!
//! An edit toggles one meta-fact of a Γ-encoding: `add-<meta-fact>` inserts
//! it, `del-<meta-fact>` removes it. An edit sequence applied to Γ(M_h) step
//! by step yields the hypothesized human model at each depth; the sequence
//! itself is the belief update reported to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::task::{Fact, Gamma, MetaFact, Operator, TaskError, TaskResult};

/// One meta-fact toggle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edit {
    Add(MetaFact),
    Del(MetaFact),
}

impl Edit {
    pub fn meta_fact(&self) -> &MetaFact {
        match self {
            Edit::Add(meta) | Edit::Del(meta) => meta,
        }
    }

    /// Applies the toggle.
    ///
    /// An `add` of a present meta-fact or a `del` of an absent one means the
    /// sequence was built against a different encoding, and fails.
    pub fn apply(&self, gamma: &Gamma) -> TaskResult<Gamma> {
        match self {
            Edit::Add(meta) if gamma.contains(meta) => {
                Err(TaskError::inapplicable_edit(self, "meta-fact already present"))
            }
            Edit::Del(meta) if !gamma.contains(meta) => {
                Err(TaskError::inapplicable_edit(self, "meta-fact not present"))
            }
            Edit::Add(meta) => Ok(gamma.with(meta.clone())),
            Edit::Del(meta) => Ok(gamma.without(meta)),
        }
    }

    /// Renders the edit as a STRIPS operator of the meta-level task.
    ///
    /// Its preconditions are the whole parent encoding; it adds or deletes
    /// the single toggled meta-fact. Possible-effect sets stay empty.
    pub fn to_meta_operator(&self, parent: &Gamma) -> Operator {
        let toggled = [self.meta_fact().to_fact()];
        let none: [Fact; 0] = [];
        let preconditions = parent.to_state();
        match self {
            Edit::Add(_) => Operator::new(self.to_string(), preconditions, toggled, none),
            Edit::Del(_) => Operator::new(self.to_string(), preconditions, none, toggled),
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Add(meta) => write!(f, "add-{}", meta),
            Edit::Del(meta) => write!(f, "del-{}", meta),
        }
    }
}

impl FromStr for Edit {
    type Err = TaskError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = raw.strip_prefix("add-") {
            return Ok(Edit::Add(rest.parse()?));
        }
        if let Some(rest) = raw.strip_prefix("del-") {
            return Ok(Edit::Del(rest.parse()?));
        }
        Err(TaskError::malformed_meta_fact(raw))
    }
}

/// Ordered edits, the externally meaningful search output
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditSequence(Vec<Edit>);

impl EditSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.0
    }

    /// Copy of the sequence with `edit` appended
    pub fn extended(&self, edit: Edit) -> Self {
        let mut next = self.0.clone();
        next.push(edit);
        Self(next)
    }

    /// Applies every edit in order
    pub fn apply_to(&self, gamma: &Gamma) -> TaskResult<Gamma> {
        self.0.iter().try_fold(gamma.clone(), |g, edit| edit.apply(&g))
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl From<Vec<Edit>> for EditSequence {
    fn from(edits: Vec<Edit>) -> Self {
        Self(edits)
    }
}

/// Single-meta-fact edits moving `from` one step toward `to`.
///
/// Deletions of meta-facts only `from` holds come first, then additions of
/// meta-facts only `to` holds, each group in meta-fact order.
pub fn edits_toward(from: &Gamma, to: &Gamma) -> Vec<Edit> {
    from.difference(to)
        .iter()
        .cloned()
        .map(Edit::Del)
        .chain(to.difference(from).iter().cloned().map(Edit::Add))
        .collect()
}

impl fmt::Display for EditSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(", "))
    }
}
