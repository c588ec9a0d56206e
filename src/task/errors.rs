//! Task error types
//!
//! Error codes:
//! - RECON_TASK_INAPPLICABLE_OPERATOR (FATAL)
//! - RECON_TASK_INAPPLICABLE_EDIT (FATAL)
//! - RECON_TASK_UNKNOWN_OPERATOR (FATAL)
//! - RECON_TASK_MALFORMED_META_FACT (WARNING)

use std::fmt;

/// Severity levels for task errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Data-quality issue, the offending item is dropped
    Warning,
    /// Broken caller invariant, the operation is aborted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Task-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskErrorCode {
    /// Operator applied to a state missing one of its preconditions
    InapplicableOperator,
    /// Edit applied to an encoding it cannot toggle
    InapplicableEdit,
    /// Plan step names an operator the task does not define
    UnknownOperator,
    /// String meta-fact matching no template
    MalformedMetaFact,
}

impl TaskErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            TaskErrorCode::InapplicableOperator => "RECON_TASK_INAPPLICABLE_OPERATOR",
            TaskErrorCode::InapplicableEdit => "RECON_TASK_INAPPLICABLE_EDIT",
            TaskErrorCode::UnknownOperator => "RECON_TASK_UNKNOWN_OPERATOR",
            TaskErrorCode::MalformedMetaFact => "RECON_TASK_MALFORMED_META_FACT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            TaskErrorCode::MalformedMetaFact => Severity::Warning,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for TaskErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Task error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskError {
    code: TaskErrorCode,
    message: String,
}

impl TaskError {
    /// Operator preconditions do not hold in the state
    pub fn inapplicable_operator(operator: &str, missing: impl IntoIterator<Item = impl fmt::Display>) -> Self {
        let missing: Vec<String> = missing.into_iter().map(|f| f.to_string()).collect();
        Self {
            code: TaskErrorCode::InapplicableOperator,
            message: format!(
                "Operator '{}' is not applicable, missing preconditions: {}",
                operator,
                missing.join(", ")
            ),
        }
    }

    /// Edit cannot be applied to the encoding
    pub fn inapplicable_edit(edit: impl fmt::Display, reason: &str) -> Self {
        Self {
            code: TaskErrorCode::InapplicableEdit,
            message: format!("Edit '{}' is not applicable: {}", edit, reason),
        }
    }

    /// Operator name not defined by the task
    pub fn unknown_operator(operator: &str) -> Self {
        Self {
            code: TaskErrorCode::UnknownOperator,
            message: format!("Operator '{}' is not defined", operator),
        }
    }

    /// Meta-fact string matches no template
    pub fn malformed_meta_fact(raw: &str) -> Self {
        Self {
            code: TaskErrorCode::MalformedMetaFact,
            message: format!("Unknown meta-fact '{}'", raw),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> TaskErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the error aborts the operation
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for TaskError {}

/// Result type for task operations
pub type TaskResult<T> = Result<T, TaskError>;
