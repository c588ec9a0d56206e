//! STRIPS task model and Γ-encoding
//!
//! # Contents
//!
//! - Facts, states and operators with checked state transitions
//! - Tasks (models) with successor generation and the meta-level task
//! - Plans, with applicability and optimality checks against a model
//! - Γ-encoding of a task into comparable meta-facts, and decoding back
//!
//! # Invariants
//!
//! - Tasks and operators are immutable after construction
//! - Applying an inapplicable operator is an error, never a silent state
//! - `decode(encode(m))` has the same initial, goal and operator
//!   precondition/effect memberships as `m`

mod decode;
mod errors;
mod fact;
mod gamma;
mod operator;
mod plan;
#[allow(clippy::module_inception)]
mod task;

pub use decode::DecodeContext;
pub use errors::{Severity, TaskError, TaskErrorCode, TaskResult};
pub use fact::{state, Fact, State};
pub use gamma::{Gamma, MetaFact};
pub use operator::Operator;
pub use plan::{is_applicable, is_optimal, Plan};
pub use task::Task;
