//! coffee-planner: demand estimation, parameter assembly, MILP
//! construction, solving, and projection for the coffee procurement
//! planning pipeline (spec §4).
//!
//! This crate owns no persistence and no HTTP surface — it is handed a
//! [`coffee_core::PlanRequest`] plus externally-fetched entities and
//! returns a [`coffee_core::PlanResult`]. Wiring it to storage and to a
//! CLI/HTTP front end is `coffee-persistence`/`coffee-cli`'s job.

pub mod assembly;
pub mod demand;
pub mod error;
pub mod milp;
pub mod projector;
pub mod solver;

use coffee_core::{Distributor, Office, PlanRequest, PlanResult, Pln, PriorPlanOrder};

use crate::assembly::{assemble_advanced, CorrectionConfig};
use crate::demand::DemandConfig;
use crate::error::PlannerResult;
use crate::solver::{solve_advanced, SolverConfig};

/// Run the full advanced-formulation pipeline: assemble → build → solve →
/// project. This is the entry point `coffee-cli`'s `plan`/`replan`
/// subcommands call; `coffee-persistence` supplies `offices`,
/// `distributors`, and `prior_orders`, and is handed the returned
/// [`PlanResult`] to store.
#[allow(clippy::too_many_arguments)]
pub fn plan_advanced(
    request: &PlanRequest,
    offices: &[Office],
    distributors: &[Distributor],
    demand_config: &DemandConfig,
    prior_orders: &[PriorPlanOrder],
    correction_config: Option<&CorrectionConfig>,
    solver_config: &SolverConfig,
) -> PlannerResult<PlanResult> {
    let (params, diagnostics) = assemble_advanced(
        request,
        offices,
        distributors,
        demand_config,
        prior_orders,
        correction_config,
    )
    .map_err(error::PlannerError::from)?;

    for issue in &diagnostics.issues {
        tracing::warn!(category = %issue.category, message = %issue.message, "assembly diagnostic");
    }

    let outcome = solve_advanced(&params, solver_config)?;

    let (orders, inventory) = match &outcome.solution {
        Some(solution) => projector::project_advanced(&params, &outcome.variables, solution.as_ref())?,
        None => (Vec::new(), Vec::new()),
    };

    Ok(PlanResult {
        status: outcome.status,
        objective_pln: outcome.objective_pln.map(Pln),
        solve_ms: outcome.solve_ms,
        orders,
        inventory,
    })
}

/// Run the baseline-formulation pipeline for a single office, single
/// implicit supplier request (spec §4.3 "Baseline formulation").
#[allow(clippy::too_many_arguments)]
pub fn plan_baseline(
    office: &Office,
    price_pln_per_kg: &[Pln],
    transport_cost_pln: Pln,
    demand_config: &DemandConfig,
    demand: &coffee_core::DemandInput,
    initial_inventory_kg: coffee_core::Kilograms,
    horizon_days: usize,
    solver_config: &SolverConfig,
) -> PlannerResult<PlanResult> {
    let params = assembly::assemble_baseline(
        office,
        price_pln_per_kg,
        transport_cost_pln,
        demand_config,
        demand,
        initial_inventory_kg,
        horizon_days,
    )
    .map_err(error::PlannerError::from)?;

    let outcome = crate::solver::solve_baseline(&params, solver_config)?;

    let (orders, inventory) = match &outcome.solution {
        Some(solution) => projector::project_baseline(&params, &outcome.variables, solution.as_ref())?,
        None => (Vec::new(), Vec::new()),
    };

    Ok(PlanResult {
        status: outcome.status,
        objective_pln: outcome.objective_pln.map(Pln),
        solve_ms: outcome.solve_ms,
        orders,
        inventory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::DemandConfig;
    use chrono::NaiveDate;
    use coffee_core::{DemandInput, Kilograms};
    use std::collections::HashMap;

    #[test]
    fn plan_baseline_end_to_end_returns_optimal() {
        let office = Office {
            id: 1,
            name: "HQ".into(),
            capacity_kg: Kilograms(150.0),
            daily_loss_fraction: 0.1,
            active: true,
        };
        let demand = DemandInput {
            office_id: 1,
            workers: vec![50, 90, 60, 50, 31, 15, 15],
            conferences: vec![1, 0, 3, 7, 0, 0, 0],
        };
        let prices = [
            Pln(12.0),
            Pln(10.0),
            Pln(14.0),
            Pln(10.0),
            Pln(13.0),
            Pln(11.0),
            Pln(15.0),
        ];

        let result = plan_baseline(
            &office,
            &prices,
            Pln(100.0),
            &DemandConfig::default(),
            &demand,
            Kilograms(40.0),
            7,
            &SolverConfig::default(),
        )
        .unwrap();

        assert!(result.status.is_optimal());
        assert!(result.inventory.iter().all(|snap| snap.level_kg.value() >= -1e-6));
    }

    #[test]
    fn plan_advanced_end_to_end_returns_optimal() {
        let office = Office {
            id: 1,
            name: "HQ".into(),
            capacity_kg: Kilograms(150.0),
            daily_loss_fraction: 0.1,
            active: true,
        };
        let distributor = Distributor {
            id: 1,
            name: "Acme".into(),
            fixed_delivery_cost: HashMap::from([(1, Pln(100.0))]),
            lead_time_days: HashMap::from([(1, 0)]),
            supply_cap_kg: vec![Kilograms(1000.0); 3],
            tier_thresholds_kg: vec![Kilograms(0.0)],
            tier_prices: vec![vec![Pln(12.0)]; 3],
        };
        let request = PlanRequest {
            offices: vec![1],
            horizon_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            horizon_days: 3,
            initial_inventory_kg: HashMap::from([(1, Kilograms(40.0))]),
            demand: vec![DemandInput {
                office_id: 1,
                workers: vec![50, 90, 60],
                conferences: vec![1, 0, 3],
            }],
            is_correction_mode: false,
            prior_plan_ref: None,
        };

        let result = plan_advanced(
            &request,
            &[office],
            &[distributor],
            &DemandConfig::default(),
            &[],
            None,
            &SolverConfig::default(),
        )
        .unwrap();

        assert!(result.status.is_optimal());
    }
}
