//! reconcile - Model reconciliation search for explainable planning
//!
//! Given a robot model, a human model and a plan produced by the robot, find
//! the smallest belief update that makes the plan unsurprising to the human.
//!
//! - `task`: STRIPS models, plan checks and the Γ meta-fact encoding
//! - `planner`: the optimal planner boundary and reference planners
//! - `reconcile`: MCE and MME searches over edited models
//! - `observability`: structured logs and search metrics

pub mod observability;
pub mod planner;
pub mod reconcile;
pub mod task;
