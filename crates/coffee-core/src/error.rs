//! Unified error type for the parts of the pipeline that own assembly-time
//! and persistence-boundary failures.
//!
//! Solve-time outcomes (`Infeasible`, `TimedOut`, `SolverError`) live in
//! `coffee-planner` instead — they are produced by the solver driver, not
//! by parameter assembly, and keeping them apart means a `CoreError` can
//! never accidentally claim a solver ran when it never got that far.

use thiserror::Error;

/// Errors raised while assembling or validating planning input, or while
/// crossing the persistence boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Schema or cross-field validation failure. Names the offending field
    /// so a caller can surface it directly (spec §6: HTTP 400 "with the
    /// offending field named").
    #[error("invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A correction run's `PriorPlanRef` does not resolve, or resolves to
    /// a plan whose office set doesn't match the current request.
    #[error("correction precondition failed: {0}")]
    CorrectionPreconditionFailed(String),

    /// The persistence collaborator is unavailable or a transaction
    /// conflicted. Recomputable and idempotent: callers may retry.
    #[error("persistence error: {0}")]
    PersistenceError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_names_the_field() {
        let err = CoreError::invalid("daily_loss_fraction", "must be in [0,1]");
        assert!(err.to_string().contains("daily_loss_fraction"));
    }
}
