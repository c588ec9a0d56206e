//! Search results

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::edit::EditSequence;
use super::errors::ReconcileResult;
use super::trace::SearchTrace;
use crate::observability::MetricsSnapshot;
use crate::task::{Plan, Task};

/// Which search produced an explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Mce,
    Mme,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Mce => "mce",
            Algorithm::Mme => "mme",
        }
    }

    /// Prefix for the run's observation scope events
    pub(crate) fn scope_name(&self) -> &'static str {
        match self {
            Algorithm::Mce => "MCE_SEARCH",
            Algorithm::Mme => "MME_SEARCH",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The belief update found by a search, with run statistics.
///
/// `plan` is always the explained plan, unchanged. `model` is the model the
/// edits lead to: the reconciled model for MCE, the model at the end of the
/// best sequence for MME.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub algorithm: Algorithm,
    pub run_id: Uuid,
    pub plan: Plan,
    pub edits: EditSequence,
    pub model: Task,
    pub metrics: MetricsSnapshot,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<SearchTrace>,
}

impl Explanation {
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn to_json(&self) -> ReconcileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} explanation for plan {}", self.algorithm, self.plan)?;
        writeln!(f, "  edits ({}): {}", self.edits.len(), self.edits)?;
        write!(
            f,
            "  evaluated {} candidates, {} planner calls, {} ms",
            self.metrics.nodes_evaluated, self.metrics.planner_calls, self.elapsed_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::edit::Edit;
    use crate::task::{state, MetaFact, Operator, State};

    fn sample() -> Explanation {
        let op = Operator::new("a", ["p"], ["q"], Vec::<&str>::new());
        Explanation {
            algorithm: Algorithm::Mce,
            run_id: Uuid::new_v4(),
            plan: Plan::new(vec![op.clone()]),
            edits: EditSequence::from(vec![Edit::Add(MetaFact::InitHas("p".into()))]),
            model: Task::new("1", State::new(), state(["p"]), state(["q"]), vec![op]),
            metrics: MetricsSnapshot::default(),
            started_at: Utc::now(),
            elapsed_ms: 3,
            trace: None,
        }
    }

    #[test]
    fn test_json_report() {
        let explanation = sample();
        let json = explanation.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["algorithm"], "mce");
        assert_eq!(value["edits"][0], serde_json::json!({"add": {"init_has": "p"}}));
        assert!(value.get("trace").is_none());
        assert_eq!(value["run_id"], explanation.run_id.to_string());
    }

    #[test]
    fn test_display_summary() {
        let text = sample().to_string();
        assert!(text.starts_with("mce explanation for plan [a]"));
        assert!(text.contains("add-init-has-p"));
    }
}
