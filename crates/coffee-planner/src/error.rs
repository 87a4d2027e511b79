//! Solve-time outcomes (spec §4.4, §7). Kept apart from `coffee_core::CoreError`
//! so a `PlannerError` can only ever mean "a solver ran and this is what
//! happened" — assembly-time failures never reach this type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Assembly(#[from] coffee_core::CoreError),

    /// A binary variable's primal value landed further than 1e-6 from
    /// `{0,1}` after relaxation (spec §4.3 "Numerical semantics").
    #[error("non-integral binary: {0}")]
    NonIntegralBinary(String),

    #[error("solver error: {0}")]
    SolverError(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
