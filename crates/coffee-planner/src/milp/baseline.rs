//! Baseline MILP formulation (spec §4.3 "Baseline formulation"): a single
//! office, single implicit supplier, no tiers, no lead time, no
//! correction. Kept as a separate, simpler path so the legacy single-office
//! request shape never pays for the advanced formulation's index space.

use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};

use super::binary;
use crate::assembly::BaselineParameters;

#[derive(Debug, Default)]
pub struct BaselineVariables {
    /// `x_t`: kg ordered on day t (tier-0 only, renamed from `x^0` per spec).
    pub order_kg: Vec<Variable>,
    /// `y^{ord}_t`.
    pub order_placed: Vec<Variable>,
    /// `I_t`.
    pub inventory: Vec<Variable>,
}

pub fn build(params: &BaselineParameters) -> (ProblemVariables, BaselineVariables, Expression) {
    let mut vars = ProblemVariables::new();
    let mut dv = BaselineVariables::default();
    let mut objective = Expression::from(0.0);
    let t = params.demand_kg.len();

    for day in 0..t {
        let order = vars.add(variable().min(0.0));
        let placed = binary(&mut vars);
        dv.order_kg.push(order);
        dv.order_placed.push(placed);

        objective += params.price_pln_per_kg[day].value() * order;
        objective += params.transport_cost_pln.value() * placed;
    }

    for _ in 0..t {
        dv.inventory.push(vars.add(variable().min(0.0)));
    }

    (vars, dv, objective)
}

pub fn add_constraints<S: SolverModel>(mut model: S, params: &BaselineParameters, vars: &BaselineVariables) -> S {
    let t = params.demand_kg.len();
    let alpha = params.office.daily_loss_fraction;
    let capacity = params.office.capacity_kg.value();
    // The baseline formulation has no supply cap concept; order size is
    // implicitly bounded only by warehouse capacity, so `y_ord` links at a
    // conservative large constant rather than a per-day supply figure.
    let big_m = capacity.max(1.0) * 1_000.0;

    for day in 0..t {
        let prev: Expression = if day == 0 {
            Expression::from(params.initial_inventory_kg.value())
        } else {
            vars.inventory[day - 1].into()
        };

        let order = vars.order_kg[day];
        let inv = vars.inventory[day];
        let placed = vars.order_placed[day];

        model = model.with(constraint!(
            inv == (1.0 - alpha) * prev + order - params.demand_kg[day].value()
        ));
        model = model.with(constraint!(inv <= capacity));
        model = model.with(constraint!(order <= big_m * placed));
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::DemandConfig;
    use coffee_core::{DemandInput, Kilograms, Office, Pln};

    #[test]
    fn builds_one_variable_per_day() {
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

        let (_, dv, _) = build(&params);
        assert_eq!(dv.order_kg.len(), 3);
        assert_eq!(dv.inventory.len(), 3);
    }
}
