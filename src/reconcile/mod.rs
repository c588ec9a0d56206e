//! Model reconciliation search
//!
//! Searches the space of models reachable by single meta-fact edits between
//! a robot model M_r and a human model M_h, so that a plan produced in M_r
//! becomes explainable in the hypothesized human model.
//!
//! # Searches
//!
//! - MCE: from M_h toward M_r, stops at the first model in which the
//!   explained plan is optimal. The edit sequence is minimal in length.
//! - MME: from M_r toward M_h, exhaustive with monotone pruning of diffs
//!   that contain a known-invalid diff. Reports the longest valid sequence.
//!
//! Both run single-threaded over a [`Frontier`] that breaks cost ties toward
//! candidates whose differences touch the plans in play.

mod config;
mod edit;
mod errors;
mod explanation;
mod frontier;
mod mce;
mod mme;
mod reconciler;
mod run;
mod trace;

pub use config::{ReconcileConfig, RelevanceReference};
pub use edit::{edits_toward, Edit, EditSequence};
pub use errors::{ReconcileError, ReconcileResult};
pub use explanation::{Algorithm, Explanation};
pub use frontier::{Candidate, Frontier};
pub use reconciler::{mce_search, mme_search, Reconciler};
pub use trace::{SearchTrace, TraceEvent, TraceOutcome};
