//! Shared plumbing for the `plan`/`replan` subcommands: load → configure →
//! solve → serialize, mirroring `gat_cli::commands::tep::handle_solve`'s
//! shape.

pub mod plan;
pub mod replan;

use anyhow::{Context, Result};
use coffee_core::{CoreError, PlanResult, SolverStatus};
use coffee_planner::error::PlannerError;
use coffee_planner::solver::SolverConfig;
use std::collections::HashSet;
use std::path::Path;

use crate::cli::BackendArg;
use crate::input::{self, PlanInputFile};

/// Map a `PlanResult`'s status onto the process exit code spec §6/§7
/// assign to the equivalent HTTP status, since this crate stands in for
/// the HTTP layer named out of scope by spec §1. HTTP codes are folded
/// into the 0-255 exit status range rather than used verbatim.
pub fn exit_code_for(status: &SolverStatus) -> i32 {
    match status {
        SolverStatus::Optimal { .. } => 0,
        SolverStatus::Infeasible => 22,         // HTTP 422
        SolverStatus::TimedOut => 54,            // HTTP 504
        SolverStatus::SolverError { .. } => 50,  // HTTP 500
    }
}

/// Map an error that aborted the pipeline before a `PlanResult` existed
/// (assembly-time, correction-precondition, or solver-driver failures).
pub fn exit_code_for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PlannerError>() {
        Some(PlannerError::Assembly(CoreError::InvalidInput { .. })) => 40, // HTTP 400
        Some(PlannerError::Assembly(CoreError::CorrectionPreconditionFailed(_))) => 9, // HTTP 409
        Some(PlannerError::Assembly(CoreError::PersistenceError(_))) => 50, // HTTP 500
        Some(PlannerError::NonIntegralBinary(_)) | Some(PlannerError::SolverError(_)) => 50,
        None => 50,
    }
}

/// Load the input file, force correction mode when requested, run the
/// advanced-formulation pipeline, and return the result alongside its
/// exit code.
pub fn run_advanced(
    input_path: &Path,
    force_correction_mode: bool,
    backend: BackendArg,
    max_time_seconds: f64,
) -> Result<(i32, PlanResult)> {
    let PlanInputFile {
        mut request,
        offices,
        distributors,
        demand_config,
        prior_orders,
        correction,
    } = input::load(input_path)?;

    if force_correction_mode {
        request.is_correction_mode = true;
        if request.prior_plan_ref.is_none() {
            return Err(PlannerError::from(CoreError::CorrectionPreconditionFailed(
                "replan requires request.prior_plan_ref to be set".to_string(),
            ))
            .into());
        }
    }

    if request.is_correction_mode && !prior_orders.is_empty() {
        let prior_offices: HashSet<_> = prior_orders.iter().map(|o| o.office_id).collect();
        let requested_offices: HashSet<_> = request.offices.iter().copied().collect();
        if prior_offices != requested_offices {
            return Err(PlannerError::from(CoreError::CorrectionPreconditionFailed(
                "prior plan's office set does not match the current request".to_string(),
            ))
            .into());
        }
    }

    let demand_config = demand_config.map(Into::into).unwrap_or_default();
    let correction_config = correction.map(Into::into);

    let solver_config = SolverConfig {
        max_time_seconds,
        backend: backend.into(),
        ..SolverConfig::default()
    };

    let result = coffee_planner::plan_advanced(
        &request,
        &offices,
        &distributors,
        &demand_config,
        &prior_orders,
        correction_config.as_ref(),
        &solver_config,
    )?;

    let code = exit_code_for(&result.status);
    Ok((code, result))
}

pub fn write_result(result: &PlanResult, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("serializing plan result")?;
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Result written to {}", path.display());
        }
        None => println!("{json}"),
    }
    eprintln!("{}", result.summary());
    Ok(())
}
