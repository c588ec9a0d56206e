//! Reconciliation errors

use thiserror::Error;

use crate::task::TaskError;

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Reconciliation errors
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Frontier exhausted: pop on an empty frontier")]
    FrontierExhausted,

    #[error("Expansion budget of {0} evaluated candidates exceeded")]
    ExpansionBudgetExceeded(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Task(#[from] TaskError),
}

impl ReconcileError {
    /// True if the error signals a broken internal invariant
    pub fn is_fatal(&self) -> bool {
        match self {
            ReconcileError::FrontierExhausted => true,
            ReconcileError::Task(e) => e.is_fatal(),
            _ => false,
        }
    }

    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            ReconcileError::FrontierExhausted => "RECON_FRONTIER_EXHAUSTED",
            ReconcileError::ExpansionBudgetExceeded(_) => "RECON_BUDGET_EXCEEDED",
            ReconcileError::Config(_) => "RECON_CONFIG_INVALID",
            ReconcileError::Io(_) => "RECON_IO_ERROR",
            ReconcileError::Serialization(_) => "RECON_SERIALIZATION_ERROR",
            ReconcileError::Task(e) => e.code().code(),
        }
    }
}
