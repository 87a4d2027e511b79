//! Advanced MILP formulation (spec §4.3): multi-distributor, multi-office,
//! tiered pricing, lead times, optional correction mode.
//!
//! Variable and constraint construction mirrors
//! `gat_algo::power_flow`'s backend-agnostic builder: [`build`] produces
//! the decision variables and objective against a bare `ProblemVariables`,
//! and [`add_constraints`] is generic over `S: SolverModel` so the same
//! constraint set applies whichever backend `.using(...)` selected.

use std::collections::HashMap;

use coffee_core::{DistributorId, Kilograms, OfficeId, Pln};
use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};

use crate::assembly::AdvancedParameters;

type OrderKey = (DistributorId, OfficeId, usize);
type TierKey = (DistributorId, OfficeId, usize, u32);

#[derive(Debug, Default)]
pub struct CorrectionVariables {
    /// `r^+_{d,b,t,k}`, one per tier index `k = 0..=L`.
    pub r_plus: HashMap<TierKey, Variable>,
    /// `r^-_{d,b,t,k}`.
    pub r_minus: HashMap<TierKey, Variable>,
}

#[derive(Debug, Default)]
pub struct AdvancedVariables {
    /// `x^0_{d,b,t}`.
    pub x0: HashMap<OrderKey, Variable>,
    /// `x_{d,b,t,l}`, `l = 1..=L`.
    pub x_tier: HashMap<TierKey, Variable>,
    /// `I_{b,t}`.
    pub inventory: HashMap<(OfficeId, usize), Variable>,
    /// `y^{ord}_{d,b,t}`.
    pub y_order: HashMap<OrderKey, Variable>,
    /// `y^{thr}_{d,b,t,l}`, `l = 1..=L`.
    pub y_threshold: HashMap<TierKey, Variable>,
    pub correction: Option<CorrectionVariables>,
}

impl AdvancedVariables {
    /// `X_{d,b,t} = x^0_{d,b,t} + sum_{l=1..L} x_{d,b,t,l}`.
    pub fn order_quantity(&self, d: DistributorId, b: OfficeId, t: usize, num_tiers: usize) -> Expression {
        let mut expr: Expression = self.x0[&(d, b, t)].into();
        for l in 1..=num_tiers {
            if let Some(var) = self.x_tier.get(&(d, b, t, l as u32)) {
                expr += *var;
            }
        }
        expr
    }

    /// The tier-`k` quantity variable, `k=0` meaning `x^0`.
    fn tier_quantity(&self, d: DistributorId, b: OfficeId, t: usize, k: u32) -> Variable {
        if k == 0 {
            self.x0[&(d, b, t)]
        } else {
            self.x_tier[&(d, b, t, k)]
        }
    }
}

use super::binary;

/// Build decision variables and the objective for the advanced formulation.
/// Constraints are added afterwards, once a backend has been selected, by
/// [`add_constraints`].
pub fn build(params: &AdvancedParameters) -> (ProblemVariables, AdvancedVariables, Expression) {
    let mut vars = ProblemVariables::new();
    let mut dv = AdvancedVariables::default();
    let mut objective = Expression::from(0.0);

    for d in &params.distributors {
        for office in &params.offices {
            let b = office.id;
            for t in 0..params.horizon_days {
                let x0 = vars.add(variable().min(0.0));
                dv.x0.insert((d.id, b, t), x0);
                objective += d.tier_prices[t][0].value() * x0;

                let y_ord = binary(&mut vars);
                dv.y_order.insert((d.id, b, t), y_ord);
                if let Some(fixed) = d.fixed_cost_for(b) {
                    objective += fixed.value() * y_ord;
                }

                for l in 1..=params.num_tiers {
                    let x_l = vars.add(variable().min(0.0));
                    dv.x_tier.insert((d.id, b, t, l as u32), x_l);
                    objective += d.tier_prices[t][l].value() * x_l;

                    let y_thr = binary(&mut vars);
                    dv.y_threshold.insert((d.id, b, t, l as u32), y_thr);
                }
            }
        }
    }

    for office in &params.offices {
        for t in 0..params.horizon_days {
            dv.inventory.insert((office.id, t), vars.add(variable().min(0.0)));
        }
    }

    if let Some(correction) = &params.correction {
        let mut corr = CorrectionVariables::default();
        for d in &params.distributors {
            for office in &params.offices {
                let b = office.id;
                for t in 0..params.horizon_days {
                    let cost = correction
                        .k_cost_pln
                        .get(&(d.id, b, t))
                        .copied()
                        .unwrap_or(Pln(0.0));
                    for k in 0..=params.num_tiers as u32 {
                        let r_plus = vars.add(variable().min(0.0));
                        let r_minus = vars.add(variable().min(0.0));
                        objective += cost.value() * r_plus;
                        objective += cost.value() * r_minus;
                        corr.r_plus.insert((d.id, b, t, k), r_plus);
                        corr.r_minus.insert((d.id, b, t, k), r_minus);
                    }
                }
            }
        }
        dv.correction = Some(corr);
    }

    (vars, dv, objective)
}

/// Add every constraint of spec §4.3 to an already-backed solver model.
pub fn add_constraints<S: SolverModel>(mut model: S, params: &AdvancedParameters, vars: &AdvancedVariables) -> S {
    let l = params.num_tiers;

    // Constraint 1 (inventory identity) and 2 (capacity).
    for office in &params.offices {
        let b = office.id;
        let alpha = office.daily_loss_fraction;
        let i0 = params.initial_inventory_kg[&b];
        let demand = &params.demand_kg[&b];

        for t in 0..params.horizon_days {
            let prev: Expression = if t == 0 {
                Expression::from(i0.value())
            } else {
                vars.inventory[&(b, t - 1)].into()
            };

            let mut arrivals = Expression::from(
                params
                    .historical_arrivals_kg
                    .get(&(b, t))
                    .copied()
                    .unwrap_or(Kilograms(0.0))
                    .value(),
            );
            for d in &params.distributors {
                if let Some(lead) = d.lead_time_for(b) {
                    let lead = lead as usize;
                    if lead <= t {
                        arrivals += vars.order_quantity(d.id, b, t - lead, l);
                    }
                }
            }

            let inv = vars.inventory[&(b, t)];
            model = model.with(constraint!(
                inv == (1.0 - alpha) * prev + arrivals - demand[t].value()
            ));
            model = model.with(constraint!(inv <= office.capacity_kg.value()));
        }
    }

    // Constraint 4 (order-placement linking) and 5 (supply cap per distributor/day).
    for d in &params.distributors {
        for t in 0..params.horizon_days {
            let supply_cap = d.supply_cap_kg[t].value();
            let mut total_across_offices = Expression::from(0.0);

            for office in &params.offices {
                let b = office.id;
                let x0 = vars.x0[&(d.id, b, t)];
                let y_ord = vars.y_order[&(d.id, b, t)];

                model = model.with(constraint!(x0 <= supply_cap * y_ord));
                for k in 1..=l as u32 {
                    let y_thr = vars.y_threshold[&(d.id, b, t, k)];
                    model = model.with(constraint!(y_thr <= y_ord));
                }

                total_across_offices += vars.order_quantity(d.id, b, t, l);
            }

            model = model.with(constraint!(total_across_offices <= supply_cap));
        }
    }

    // Constraint 6 (tier partition, activation, staircase filling).
    for d in &params.distributors {
        for office in &params.offices {
            let b = office.id;
            for t in 0..params.horizon_days {
                if l == 0 {
                    continue;
                }
                let q1 = d.tier_thresholds_kg[1].value();
                let x0 = vars.x0[&(d.id, b, t)];

                model = model.with(constraint!(x0 <= q1));
                let y_thr_1 = vars.y_threshold[&(d.id, b, t, 1)];
                model = model.with(constraint!(x0 >= q1 * y_thr_1));

                for tier in 1..=l {
                    let x_tier = vars.x_tier[&(d.id, b, t, tier as u32)];
                    let y_thr = vars.y_threshold[&(d.id, b, t, tier as u32)];

                    if tier < l {
                        // Width of tier `tier`: (Q_{tier+1} - Q_tier).
                        let width = d.tier_thresholds_kg[tier + 1].value() - d.tier_thresholds_kg[tier].value();
                        model = model.with(constraint!(x_tier <= width * y_thr));
                        let y_thr_next = vars.y_threshold[&(d.id, b, t, (tier + 1) as u32)];
                        model = model.with(constraint!(x_tier >= width * y_thr_next));
                    } else {
                        model = model.with(constraint!(x_tier <= params.big_m.value() * y_thr));
                    }
                }
            }
        }
    }

    // Constraints 7-8 (correction linkage and cap), correction mode only.
    if let Some(correction) = &params.correction {
        if let Some(corr_vars) = &vars.correction {
            for d in &params.distributors {
                for office in &params.offices {
                    let b = office.id;
                    for t in 0..params.horizon_days {
                        let mut cap_sum = Expression::from(0.0);
                        for k in 0..=l as u32 {
                            let x_k = vars.tier_quantity(d.id, b, t, k);
                            let r_plus = corr_vars.r_plus[&(d.id, b, t, k)];
                            let r_minus = corr_vars.r_minus[&(d.id, b, t, k)];
                            let x_kor = correction
                                .x_kor
                                .get(&(d.id, b, t, k))
                                .copied()
                                .unwrap_or(Kilograms(0.0))
                                .value();

                            model = model.with(constraint!(x_k == x_kor + r_plus - r_minus));
                            cap_sum += r_plus;
                            cap_sum += r_minus;
                        }

                        let r_max = correction
                            .r_max_kg
                            .get(&(d.id, b, t))
                            .copied()
                            .unwrap_or(Kilograms(0.0))
                            .value();
                        model = model.with(constraint!(cap_sum <= r_max));
                    }
                }
            }
        }
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::DemandConfig;
    use coffee_core::{Distributor, Office, PlanRequest};
    use std::collections::HashMap as Map;

    fn single_office_single_distributor(t: usize, q1: f64) -> AdvancedParameters {
        use chrono::NaiveDate;

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
            fixed_delivery_cost: Map::from([(1, Pln(100.0))]),
            lead_time_days: Map::from([(1, 0)]),
            supply_cap_kg: vec![Kilograms(1000.0); t],
            tier_thresholds_kg: vec![Kilograms(0.0), Kilograms(q1)],
            tier_prices: vec![vec![Pln(12.0), Pln(10.0)]; t],
        };
        let request = PlanRequest {
            offices: vec![1],
            horizon_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            horizon_days: t as u32,
            initial_inventory_kg: Map::from([(1, Kilograms(40.0))]),
            demand: vec![coffee_core::DemandInput {
                office_id: 1,
                workers: vec![50; t],
                conferences: vec![0; t],
            }],
            is_correction_mode: false,
            prior_plan_ref: None,
        };
        let (params, _) = crate::assembly::assemble_advanced(
            &request,
            &[office],
            &[distributor],
            &DemandConfig::default(),
            &[],
            None,
        )
        .unwrap();
        params
    }

    #[test]
    fn builds_one_variable_set_per_index() {
        let params = single_office_single_distributor(3, 20.0);
        let (_, dv, _) = build(&params);
        assert_eq!(dv.x0.len(), 3);
        assert_eq!(dv.x_tier.len(), 3);
        assert_eq!(dv.inventory.len(), 3);
        assert!(dv.correction.is_none());
    }

    #[test]
    fn order_quantity_does_not_panic_across_tier_counts() {
        let params = single_office_single_distributor(1, 20.0);
        let (_, dv, _) = build(&params);
        let _ = dv.order_quantity(1, 1, 0, params.num_tiers);
        let _ = dv.order_quantity(1, 1, 0, 0);
    }
}
