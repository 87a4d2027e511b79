//! Plan Projector (spec §4.5): pure functions turning a solved model's
//! primal values back into [`OrderIntent`]/[`InventorySnapshot`] records.
//! Grounded on `solve_tep`'s extraction code — value lookups, rounding,
//! cost recomputation from the primal values rather than re-trusting the
//! objective alone.

use std::collections::HashMap;

use coffee_core::{InventorySnapshot, Kilograms, OfficeId, OrderIntent, Pln};
use good_lp::Solution;

use crate::assembly::{AdvancedParameters, BaselineParameters};
use crate::error::PlannerResult;
use crate::milp::advanced::AdvancedVariables;
use crate::milp::baseline::BaselineVariables;
use crate::solver::round_binaries;

/// Sentinel distributor id for the baseline formulation's single implicit
/// supplier (spec §4.3 "Baseline formulation": `|D|=1`, left anonymous).
pub const BASELINE_DISTRIBUTOR_ID: u32 = 0;

/// Project the advanced formulation's solution into orders and inventory
/// snapshots. Orders with zero placed quantity are omitted. Returned
/// orders are sorted by `(placement_day, distributor_id, office_id,
/// tier_achieved)`.
pub fn project_advanced(
    params: &AdvancedParameters,
    vars: &AdvancedVariables,
    solution: &dyn Solution,
) -> PlannerResult<(Vec<OrderIntent>, Vec<InventorySnapshot>)> {
    let l = params.num_tiers;
    let mut orders = Vec::new();

    for t in 0..params.horizon_days {
        for d in &params.distributors {
            for office in &params.offices {
                let b = office.id;
                let y_ord = solution.value(vars.y_order[&(d.id, b, t)]);
                let [placed] = round_binaries([y_ord])?.try_into().unwrap();
                if !placed {
                    continue;
                }

                let x0 = solution.value(vars.x0[&(d.id, b, t)]);
                let mut qty = x0;
                let mut tier_achieved = 0u32;
                for k in 1..=l as u32 {
                    let y_thr = solution.value(vars.y_threshold[&(d.id, b, t, k)]);
                    if round_binaries([y_thr])?[0] {
                        tier_achieved = k;
                        qty += solution.value(vars.x_tier[&(d.id, b, t, k)]);
                    }
                }

                let lead_time = d.lead_time_for(b).unwrap_or(0);
                let unit_price = d.tier_prices[t][tier_achieved as usize];
                let transport_cost = d.fixed_cost_for(b).unwrap_or(Pln(0.0));
                let total_cost = Pln(qty * unit_price.value() + transport_cost.value());

                orders.push(OrderIntent {
                    office_id: b,
                    distributor_id: d.id,
                    placement_day: t as u32,
                    delivery_day: (t as u32) + lead_time,
                    qty_kg: Kilograms(qty),
                    unit_price,
                    tier_achieved,
                    transport_cost,
                    total_cost,
                });
            }
        }
    }

    orders.sort_by_key(|o| (o.placement_day, o.distributor_id, o.office_id, o.tier_achieved));

    let mut arrivals_by_office_day: HashMap<(OfficeId, usize), f64> = HashMap::new();
    for order in &orders {
        let day = order.delivery_day as usize;
        if day < params.horizon_days {
            *arrivals_by_office_day.entry((order.office_id, day)).or_insert(0.0) += order.qty_kg.value();
        }
    }
    for (&(b, t), kg) in &params.historical_arrivals_kg {
        *arrivals_by_office_day.entry((b, t)).or_insert(0.0) += kg.value();
    }

    let mut snapshots = Vec::new();
    for office in &params.offices {
        let b = office.id;
        let alpha = office.daily_loss_fraction;
        let mut prev = params.initial_inventory_kg[&b].value();

        for t in 0..params.horizon_days {
            let level = solution.value(vars.inventory[&(b, t)]);
            let deliveries = arrivals_by_office_day.get(&(b, t)).copied().unwrap_or(0.0);
            let loss = alpha * prev;
            let demand = params.demand_kg[&b][t].value();

            snapshots.push(InventorySnapshot {
                office_id: b,
                day: t as u32,
                level_kg: Kilograms(level),
                demand_fulfilled_kg: Kilograms(demand),
                loss_kg: Kilograms(loss),
                deliveries_received_kg: Kilograms(deliveries),
                is_projected: true,
            });

            prev = level;
        }
    }

    Ok((orders, snapshots))
}

/// Project the baseline formulation's solution. Orders are attributed to
/// [`BASELINE_DISTRIBUTOR_ID`] and arrive the same day they are placed
/// (`X≡0`, spec §4.3).
pub fn project_baseline(
    params: &BaselineParameters,
    vars: &BaselineVariables,
    solution: &dyn Solution,
) -> PlannerResult<(Vec<OrderIntent>, Vec<InventorySnapshot>)> {
    let t = params.demand_kg.len();
    let office_id = params.office.id;
    let mut orders = Vec::new();

    for day in 0..t {
        let placed_val = solution.value(vars.order_placed[day]);
        let placed = round_binaries([placed_val])?[0];
        if !placed {
            continue;
        }

        let qty = solution.value(vars.order_kg[day]);
        let unit_price = params.price_pln_per_kg[day];
        let total_cost = Pln(qty * unit_price.value() + params.transport_cost_pln.value());

        orders.push(OrderIntent {
            office_id,
            distributor_id: BASELINE_DISTRIBUTOR_ID,
            placement_day: day as u32,
            delivery_day: day as u32,
            qty_kg: Kilograms(qty),
            unit_price,
            tier_achieved: 0,
            transport_cost: params.transport_cost_pln,
            total_cost,
        });
    }

    let mut prev = params.initial_inventory_kg.value();
    let mut snapshots = Vec::with_capacity(t);
    let alpha = params.office.daily_loss_fraction;

    for day in 0..t {
        let level = solution.value(vars.inventory[day]);
        let delivered = orders
            .iter()
            .find(|o| o.placement_day as usize == day)
            .map(|o| o.qty_kg.value())
            .unwrap_or(0.0);

        snapshots.push(InventorySnapshot {
            office_id,
            day: day as u32,
            level_kg: Kilograms(level),
            demand_fulfilled_kg: params.demand_kg[day],
            loss_kg: Kilograms(alpha * prev),
            deliveries_received_kg: Kilograms(delivered),
            is_projected: true,
        });

        prev = level;
    }

    Ok((orders, snapshots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::DemandConfig;
    use crate::solver::{solve_baseline, SolverConfig};
    use coffee_core::{DemandInput, Office};

    #[test]
    fn baseline_projection_conserves_inventory_identity() {
        let office = Office {
            id: 1,
            name: "HQ".into(),
            capacity_kg: Kilograms(150.0),
            daily_loss_fraction: 0.1,
            active: true,
        };
        let demand = DemandInput {
            office_id: 1,
            workers: vec![50, 90, 60],
            conferences: vec![1, 0, 3],
        };
        let params = crate::assembly::assemble_baseline(
            &office,
            &[Pln(12.0), Pln(10.0), Pln(14.0)],
            Pln(100.0),
            &DemandConfig::default(),
            &demand,
            Kilograms(40.0),
            3,
        )
        .unwrap();

        let outcome = solve_baseline(&params, &SolverConfig::default()).unwrap();
        assert!(outcome.status.is_optimal());
        let solution = outcome.solution.unwrap();

        let (orders, snapshots) = project_baseline(&params, &outcome.variables, solution.as_ref()).unwrap();
        assert_eq!(snapshots.len(), 3);
        for order in &orders {
            assert_eq!(order.distributor_id, BASELINE_DISTRIBUTOR_ID);
            assert!(order.qty_kg.value() >= 0.0);
        }
    }
}
