//! Solver Driver (spec §4.4): invokes an MIP solver, enforces a time
//! budget, maps solver status onto the typed [`SolverStatus`] outcome, and
//! extracts primal values. Backend dispatch mirrors
//! `gat_algo::power_flow`'s enum-over-backends pattern: variables and the
//! objective are built once against a bare `ProblemVariables`, then the
//! concrete backend is selected via `.using(...)` before constraints are
//! attached, so every backend solves an identical model.

use std::time::Instant;

use coffee_core::SolverStatus;
use good_lp::{Solution, SolverModel};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assembly::{AdvancedParameters, BaselineParameters};
use crate::error::{PlannerError, PlannerResult};
use crate::milp::advanced::AdvancedVariables;
use crate::milp::baseline::BaselineVariables;
use crate::milp::{advanced, baseline};

/// Rounding tolerance for binary primal values (spec §4.3).
const BINARY_TOLERANCE: f64 = 1e-6;

/// Which `good_lp` backend to dispatch to. `Clarabel` is always available
/// (pure-Rust, no external solver binary); `Highs` is the true-MILP path
/// behind the `solver-highs` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverBackend {
    #[default]
    Clarabel,
    #[cfg(feature = "solver-highs")]
    Highs,
}

/// Solver tuning, kept as plain configuration rather than global state
/// (spec §9 "Global mutable state").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverConfig {
    pub max_time_seconds: f64,
    pub mip_gap: f64,
    pub backend: SolverBackend,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_time_seconds: 30.0,
            mip_gap: 1e-4,
            backend: SolverBackend::default(),
        }
    }
}

/// The outcome of an advanced-formulation solve: a typed status plus,
/// when optimal, the objective value, the decision variables the model
/// was built with, and a boxed [`Solution`] the Plan Projector reads
/// primal values from. The variables must travel with the solution
/// because each `build()` call mints fresh `good_lp::Variable` handles.
pub struct AdvancedSolveOutcome {
    pub status: SolverStatus,
    pub objective_pln: Option<f64>,
    pub solve_ms: u64,
    pub variables: AdvancedVariables,
    pub solution: Option<Box<dyn Solution>>,
}

/// The outcome of a baseline-formulation solve; see [`AdvancedSolveOutcome`].
pub struct BaselineSolveOutcome {
    pub status: SolverStatus,
    pub objective_pln: Option<f64>,
    pub solve_ms: u64,
    pub variables: BaselineVariables,
    pub solution: Option<Box<dyn Solution>>,
}

fn round_binary(value: f64) -> PlannerResult<bool> {
    if (value - 0.0).abs() <= BINARY_TOLERANCE {
        Ok(false)
    } else if (value - 1.0).abs() <= BINARY_TOLERANCE {
        Ok(true)
    } else {
        Err(PlannerError::NonIntegralBinary(format!(
            "value {value} is not within {BINARY_TOLERANCE} of 0 or 1"
        )))
    }
}

/// Round every binary variable value pulled through `reader` and fail with
/// `NonIntegralBinary` (spec §4.3) on the first one outside tolerance. This
/// is the seam where the LP-relaxation path's continuous `[0,1]` values get
/// tightened back into `{0,1}` decisions before projection.
pub fn round_binaries(values: impl IntoIterator<Item = f64>) -> PlannerResult<Vec<bool>> {
    values.into_iter().map(round_binary).collect()
}

/// Map a `good_lp` resolution failure onto the §4.4 status table. `good_lp`
/// does not expose a distinct "feasible incumbent at the time limit" signal
/// through its backend-agnostic `Solution` trait, so the distinction
/// between `Infeasible` and `TimedOut` for a non-optimal result rests on
/// the reported reason string and on whether the configured time budget
/// was exhausted.
fn classify_failure(reason: String, elapsed_seconds: f64, max_time_seconds: f64) -> SolverStatus {
    if reason.to_lowercase().contains("infeasible") {
        SolverStatus::Infeasible
    } else if elapsed_seconds >= max_time_seconds {
        SolverStatus::TimedOut
    } else {
        SolverStatus::SolverError { reason }
    }
}

/// Solve the advanced formulation (spec §4.3 "advanced formulation").
pub fn solve_advanced(params: &AdvancedParameters, config: &SolverConfig) -> PlannerResult<AdvancedSolveOutcome> {
    let (vars, dv, objective) = advanced::build(params);

    info!(backend = ?config.backend, horizon_days = params.horizon_days, "solving advanced MILP");
    let start = Instant::now();

    let solve_result: Result<Box<dyn Solution>, String> = match config.backend {
        SolverBackend::Clarabel => {
            let model = vars.minimise(&objective).using(good_lp::solvers::clarabel::clarabel);
            let model = advanced::add_constraints(model, params, &dv);
            model.solve().map(|s| Box::new(s) as Box<dyn Solution>).map_err(|e| format!("{e:?}"))
        }
        #[cfg(feature = "solver-highs")]
        SolverBackend::Highs => {
            let model = vars
                .minimise(&objective)
                .using(good_lp::solvers::highs::highs)
                .set_time_limit(config.max_time_seconds);
            let model = advanced::add_constraints(model, params, &dv);
            model.solve().map(|s| Box::new(s) as Box<dyn Solution>).map_err(|e| format!("{e:?}"))
        }
    };

    let elapsed = start.elapsed();
    let solve_ms = elapsed.as_millis() as u64;

    let (status, solution) = match solve_result {
        Ok(solution) => {
            info!(solve_ms, "advanced MILP solved");
            (SolverStatus::Optimal { gap_exceeded_target: false }, Some(solution))
        }
        Err(reason) => {
            let status = classify_failure(reason, elapsed.as_secs_f64(), config.max_time_seconds);
            warn!(?status, "advanced MILP did not reach an optimal solution");
            (status, None)
        }
    };

    let objective_pln = solution.as_ref().map(|s| s.eval(&objective));

    Ok(AdvancedSolveOutcome { status, objective_pln, solve_ms, variables: dv, solution })
}

/// Solve the baseline formulation (spec §4.3 "Baseline formulation").
pub fn solve_baseline(params: &BaselineParameters, config: &SolverConfig) -> PlannerResult<BaselineSolveOutcome> {
    let (vars, dv, objective) = baseline::build(params);

    info!(backend = ?config.backend, "solving baseline MILP");
    let start = Instant::now();

    let solve_result: Result<Box<dyn Solution>, String> = match config.backend {
        SolverBackend::Clarabel => {
            let model = vars.minimise(&objective).using(good_lp::solvers::clarabel::clarabel);
            let model = baseline::add_constraints(model, params, &dv);
            model.solve().map(|s| Box::new(s) as Box<dyn Solution>).map_err(|e| format!("{e:?}"))
        }
        #[cfg(feature = "solver-highs")]
        SolverBackend::Highs => {
            let model = vars
                .minimise(&objective)
                .using(good_lp::solvers::highs::highs)
                .set_time_limit(config.max_time_seconds);
            let model = baseline::add_constraints(model, params, &dv);
            model.solve().map(|s| Box::new(s) as Box<dyn Solution>).map_err(|e| format!("{e:?}"))
        }
    };

    let elapsed = start.elapsed();
    let solve_ms = elapsed.as_millis() as u64;

    let (status, solution) = match solve_result {
        Ok(solution) => (SolverStatus::Optimal { gap_exceeded_target: false }, Some(solution)),
        Err(reason) => {
            let status = classify_failure(reason, elapsed.as_secs_f64(), config.max_time_seconds);
            (status, None)
        }
    };

    let objective_pln = solution.as_ref().map(|s| s.eval(&objective));

    Ok(BaselineSolveOutcome { status, objective_pln, solve_ms, variables: dv, solution })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_rounds_within_tolerance() {
        assert!(round_binary(0.0000001).unwrap() == false);
        assert!(round_binary(0.9999999).unwrap() == true);
    }

    #[test]
    fn binary_rejects_out_of_tolerance() {
        assert!(round_binary(0.5).is_err());
    }

    #[test]
    fn default_config_matches_spec_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.max_time_seconds, 30.0);
        assert_eq!(config.mip_gap, 1e-4);
    }

    #[test]
    fn classifies_infeasible_before_timeout() {
        let status = classify_failure("Infeasible".to_string(), 1.0, 30.0);
        assert!(matches!(status, SolverStatus::Infeasible));
    }

    #[test]
    fn classifies_timeout_when_budget_exhausted() {
        let status = classify_failure("solver gave up".to_string(), 30.0, 30.0);
        assert!(matches!(status, SolverStatus::TimedOut));
    }
}
