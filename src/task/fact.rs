//! Domain facts and states

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque domain proposition, compared by name only
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fact(String);

impl Fact {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fact {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Fact {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A set of facts that currently hold.
///
/// Ordered so that states hash and compare by value.
pub type State = BTreeSet<Fact>;

/// Builds a state from anything fact-like
pub fn state<I, F>(facts: I) -> State
where
    I: IntoIterator<Item = F>,
    F: Into<Fact>,
{
    facts.into_iter().map(Into::into).collect()
}
