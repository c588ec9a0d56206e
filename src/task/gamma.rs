//! Γ-encoding of tasks into meta-facts
//!
//! A task projects into a flat set of membership meta-facts so that two
//! models can be compared with ordinary set algebra. The string form of each
//! meta-fact follows the templates
//!
//! - `init-has-<fact>`
//! - `goal-has-<fact>`
//! - `<op>-has-precondition-<fact>`
//! - `<op>-has-add-effect-<fact>`
//! - `<op>-has-del-effect-<fact>`
//!
//! but inside the crate meta-facts are a tagged enum, so only the string
//! boundary (`FromStr`, [`Gamma::from_meta_strings`]) can fail to parse.
//! The string form cannot tell `init-has-precondition-p` from operator `init`
//! having precondition `p`, so serde writes the tagged form instead.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::TaskError;
use super::fact::{Fact, State};
use super::task::Task;
use crate::observability::{Event, Logger};

/// One membership fact about a model
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaFact {
    InitHas(Fact),
    GoalHas(Fact),
    Precondition { operator: String, fact: Fact },
    AddEffect { operator: String, fact: Fact },
    DelEffect { operator: String, fact: Fact },
}

impl MetaFact {
    /// The domain fact this meta-fact is about
    pub fn fact(&self) -> &Fact {
        match self {
            MetaFact::InitHas(fact) | MetaFact::GoalHas(fact) => fact,
            MetaFact::Precondition { fact, .. }
            | MetaFact::AddEffect { fact, .. }
            | MetaFact::DelEffect { fact, .. } => fact,
        }
    }

    /// The three operator templates for `operator` and `fact`
    pub fn operator_templates(operator: &str, fact: &Fact) -> [MetaFact; 3] {
        [
            MetaFact::Precondition {
                operator: operator.to_string(),
                fact: fact.clone(),
            },
            MetaFact::AddEffect {
                operator: operator.to_string(),
                fact: fact.clone(),
            },
            MetaFact::DelEffect {
                operator: operator.to_string(),
                fact: fact.clone(),
            },
        ]
    }

    /// The meta-fact as a fact of the meta-level task
    pub fn to_fact(&self) -> Fact {
        Fact::new(self.to_string())
    }
}

impl fmt::Display for MetaFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaFact::InitHas(fact) => write!(f, "init-has-{}", fact),
            MetaFact::GoalHas(fact) => write!(f, "goal-has-{}", fact),
            MetaFact::Precondition { operator, fact } => {
                write!(f, "{}-has-precondition-{}", operator, fact)
            }
            MetaFact::AddEffect { operator, fact } => {
                write!(f, "{}-has-add-effect-{}", operator, fact)
            }
            MetaFact::DelEffect { operator, fact } => {
                write!(f, "{}-has-del-effect-{}", operator, fact)
            }
        }
    }
}

struct Templates {
    init: Regex,
    goal: Regex,
    precondition: Regex,
    add_effect: Regex,
    del_effect: Regex,
}

fn templates() -> &'static Templates {
    static TEMPLATES: OnceLock<Templates> = OnceLock::new();
    TEMPLATES.get_or_init(|| Templates {
        init: template(r"^init-has-(.+)$"),
        goal: template(r"^goal-has-(.+)$"),
        // greedy operator group: the last `-has-…-` splits operator from fact
        precondition: template(r"^(.+)-has-precondition-(.+)$"),
        add_effect: template(r"^(.+)-has-add-effect-(.+)$"),
        del_effect: template(r"^(.+)-has-del-effect-(.+)$"),
    })
}

fn template(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Meta-fact template pattern must compile")
}

impl FromStr for MetaFact {
    type Err = TaskError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let t = templates();
        if let Some(c) = t.init.captures(raw) {
            return Ok(MetaFact::InitHas(Fact::new(&c[1])));
        }
        if let Some(c) = t.goal.captures(raw) {
            return Ok(MetaFact::GoalHas(Fact::new(&c[1])));
        }
        let split = |re: &Regex| {
            re.captures(raw)
                .map(|c| (c[1].to_string(), Fact::new(&c[2])))
        };
        if let Some((operator, fact)) = split(&t.precondition) {
            return Ok(MetaFact::Precondition { operator, fact });
        }
        if let Some((operator, fact)) = split(&t.add_effect) {
            return Ok(MetaFact::AddEffect { operator, fact });
        }
        if let Some((operator, fact)) = split(&t.del_effect) {
            return Ok(MetaFact::DelEffect { operator, fact });
        }
        Err(TaskError::malformed_meta_fact(raw))
    }
}

/// The Γ-encoding of a task: an ordered, hashable set of meta-facts
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gamma(BTreeSet<MetaFact>);

impl Gamma {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes every membership fact of the task.
    ///
    /// Possible-effect sets are not encoded.
    pub fn encode(task: &Task) -> Self {
        let mut metas = BTreeSet::new();
        for fact in task.initial_state() {
            metas.insert(MetaFact::InitHas(fact.clone()));
        }
        for fact in task.goals() {
            metas.insert(MetaFact::GoalHas(fact.clone()));
        }
        for op in task.operators() {
            let name = op.name();
            for fact in op.preconditions() {
                metas.insert(MetaFact::Precondition {
                    operator: name.to_string(),
                    fact: fact.clone(),
                });
            }
            for fact in op.add_effects() {
                metas.insert(MetaFact::AddEffect {
                    operator: name.to_string(),
                    fact: fact.clone(),
                });
            }
            for fact in op.del_effects() {
                metas.insert(MetaFact::DelEffect {
                    operator: name.to_string(),
                    fact: fact.clone(),
                });
            }
        }
        Self(metas)
    }

    /// Parses string meta-facts, dropping any that match no template.
    ///
    /// Every dropped string is logged as a warning.
    pub fn from_meta_strings<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut metas = BTreeSet::new();
        for s in raw {
            match s.as_ref().parse::<MetaFact>() {
                Ok(meta) => {
                    metas.insert(meta);
                }
                Err(e) => {
                    Logger::warn(
                        Event::MalformedMetaFact.as_str(),
                        &[("code", e.code().code()), ("meta_fact", s.as_ref())],
                    );
                }
            }
        }
        Self(metas)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, meta: &MetaFact) -> bool {
        self.0.contains(meta)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetaFact> {
        self.0.iter()
    }

    /// Copy of the encoding with `meta` added
    pub fn with(&self, meta: MetaFact) -> Self {
        let mut next = self.0.clone();
        next.insert(meta);
        Self(next)
    }

    /// Copy of the encoding with `meta` removed
    pub fn without(&self, meta: &MetaFact) -> Self {
        let mut next = self.0.clone();
        next.remove(meta);
        Self(next)
    }

    /// Meta-facts in `self` but not in `other`
    pub fn difference(&self, other: &Gamma) -> Gamma {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    /// Meta-facts in exactly one of the two encodings
    pub fn symmetric_difference(&self, other: &Gamma) -> Gamma {
        Self(self.0.symmetric_difference(&other.0).cloned().collect())
    }

    pub fn is_subset(&self, other: &Gamma) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Strips the templates, leaving the domain facts mentioned
    pub fn underlying_facts(&self) -> State {
        self.0.iter().map(|m| m.fact().clone()).collect()
    }

    /// The encoding as facts of the meta-level task
    pub fn to_state(&self) -> State {
        self.0.iter().map(MetaFact::to_fact).collect()
    }

    /// String form of every meta-fact, in order
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<MetaFact> for Gamma {
    fn from_iter<T: IntoIterator<Item = MetaFact>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Gamma {
    type Item = &'a MetaFact;
    type IntoIter = std::collections::btree_set::Iter<'a, MetaFact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::errors::TaskErrorCode;
    use crate::task::fact::state;
    use crate::task::operator::Operator;

    fn sample() -> Task {
        Task::new(
            "sample",
            State::new(),
            state(["p"]),
            state(["q"]),
            vec![Operator::new("a", ["p"], ["q"], ["p"])],
        )
    }

    #[test]
    fn test_encode_memberships() {
        let gamma = sample().gamma();
        let strings = gamma.to_strings();
        assert_eq!(
            strings,
            vec![
                "init-has-p",
                "goal-has-q",
                "a-has-precondition-p",
                "a-has-add-effect-q",
                "a-has-del-effect-p",
            ]
        );
    }

    #[test]
    fn test_parse_templates() {
        assert_eq!(
            "init-has-p".parse::<MetaFact>().unwrap(),
            MetaFact::InitHas(Fact::new("p"))
        );
        assert_eq!(
            "pick-up-has-add-effect-holding".parse::<MetaFact>().unwrap(),
            MetaFact::AddEffect {
                operator: "pick-up".into(),
                fact: Fact::new("holding"),
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "a-owns-p".parse::<MetaFact>().unwrap_err();
        assert_eq!(err.code(), TaskErrorCode::MalformedMetaFact);
    }

    #[test]
    fn test_from_meta_strings_drops_malformed() {
        let gamma = Gamma::from_meta_strings(["init-has-p", "garbage", "goal-has-q"]);
        assert_eq!(gamma.len(), 2);
        assert!(gamma.contains(&MetaFact::GoalHas(Fact::new("q"))));
    }

    #[test]
    fn test_string_round_trip() {
        let gamma = sample().gamma();
        assert_eq!(Gamma::from_meta_strings(gamma.to_strings()), gamma);
    }

    #[test]
    fn test_symmetric_difference_and_facts() {
        let a = Gamma::from_meta_strings(["init-has-p", "a-has-precondition-r"]);
        let b = Gamma::from_meta_strings(["init-has-p", "goal-has-q"]);
        let diff = a.symmetric_difference(&b);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff.underlying_facts(), state(["q", "r"]));
    }

    #[test]
    fn test_serde_is_tagged() {
        let gamma = sample().gamma().with(MetaFact::GoalHas(Fact::new("r")));
        let json = serde_json::to_value(&gamma).unwrap();
        assert_eq!(json[0], serde_json::json!({"init_has": "p"}));
        assert_eq!(
            json[2],
            serde_json::json!({"precondition": {"operator": "a", "fact": "p"}})
        );
        let back: Gamma = serde_json::from_value(json).unwrap();
        assert_eq!(back, gamma);
    }

    #[test]
    fn test_serde_keeps_reserved_operator_names() {
        let task = Task::new(
            "reserved",
            State::new(),
            State::new(),
            state(["q"]),
            vec![
                Operator::new("init", ["p"], ["q"], Vec::<&str>::new()),
                Operator::new("goal", Vec::<&str>::new(), ["p"], ["q"]),
            ],
        );
        let gamma = task.gamma();
        let json = serde_json::to_string(&gamma).unwrap();
        let back: Gamma = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gamma);
        assert!(back.contains(&MetaFact::Precondition {
            operator: "init".into(),
            fact: Fact::new("p"),
        }));
        assert!(!back.contains(&MetaFact::InitHas(Fact::new("precondition-p"))));
    }
}
