//! End-to-end scenarios S1-S5, literal per spec §8.

use std::collections::HashMap;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use coffee_core::{
    DemandInput, Distributor, Kilograms, Office, PlanRequest, Pln, PriorPlanOrder, PriorPlanRef,
    SolverStatus,
};
use coffee_planner::assembly::CorrectionConfig;
use coffee_planner::demand::DemandConfig;
use coffee_planner::solver::SolverConfig;
use coffee_planner::{plan_advanced, plan_baseline};

fn office(capacity_kg: f64, alpha: f64) -> Office {
    Office {
        id: 1,
        name: "HQ".into(),
        capacity_kg: Kilograms(capacity_kg),
        daily_loss_fraction: alpha,
        active: true,
    }
}

/// S1 (baseline): 7-day horizon, reproducible objective, never stocks out.
#[test]
fn s1_baseline_reproduces_optimal_objective() {
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
    let office = office(150.0, 0.1);

    let first = plan_baseline(
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
    let second = plan_baseline(
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

    assert!(first.status.is_optimal());
    for snapshot in &first.inventory {
        assert!(snapshot.level_kg.value() >= -1e-6);
    }
    assert_relative_eq!(
        first.objective_pln.unwrap().value(),
        second.objective_pln.unwrap().value(),
        epsilon = 1e-4
    );
}

/// S2 (infeasible capacity): same as S1 but `Vmax=5`, demand exceeds it daily.
#[test]
fn s2_tiny_capacity_is_infeasible() {
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
    let office = office(5.0, 0.1);

    let result = plan_baseline(
        &office,
        &prices,
        Pln(100.0),
        &DemandConfig::default(),
        &demand,
        Kilograms(0.0),
        7,
        &SolverConfig::default(),
    )
    .unwrap();

    assert!(matches!(result.status, SolverStatus::Infeasible));
}

/// S3 (tiered): single day, ample supply, demand lands in the highest
/// qualifying tier. The staircase forces every lower tier full before the
/// next one activates (`x_tier >= width * y_thr_next`), so 60 kg fills the
/// 0-20 and 20-50 tiers completely and spills 10 kg into the unbounded
/// top tier at its price.
#[test]
fn s3_tiered_pricing_lands_in_highest_qualifying_tier() {
    let office = office(200.0, 0.0);
    let distributor = Distributor {
        id: 1,
        name: "Acme".into(),
        fixed_delivery_cost: HashMap::from([(1, Pln(0.0))]),
        lead_time_days: HashMap::from([(1, 0)]),
        supply_cap_kg: vec![Kilograms(1000.0)],
        tier_thresholds_kg: vec![Kilograms(0.0), Kilograms(20.0), Kilograms(50.0)],
        tier_prices: vec![vec![Pln(12.0), Pln(11.0), Pln(10.0)]],
    };
    let request = PlanRequest {
        offices: vec![1],
        horizon_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        horizon_days: 1,
        initial_inventory_kg: HashMap::from([(1, Kilograms(0.0))]),
        demand: vec![DemandInput {
            office_id: 1,
            workers: vec![240],
            conferences: vec![0],
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
    let order = result
        .orders
        .iter()
        .find(|o| o.office_id == 1 && o.distributor_id == 1)
        .expect("an order was placed");
    assert_eq!(order.tier_achieved, 2);
    assert_relative_eq!(order.unit_price.value(), 10.0, epsilon = 1e-9);
    assert!(order.qty_kg.value() >= 50.0 - 1e-6);
}

/// S4 (lead time): a 2-day lead time forces the day-2 order to be placed
/// on day 0.
#[test]
fn s4_lead_time_forces_early_placement() {
    let office = office(200.0, 0.0);
    let distributor = Distributor {
        id: 1,
        name: "Acme".into(),
        fixed_delivery_cost: HashMap::from([(1, Pln(0.0))]),
        lead_time_days: HashMap::from([(1, 2)]),
        supply_cap_kg: vec![Kilograms(1000.0); 3],
        tier_thresholds_kg: vec![Kilograms(0.0)],
        tier_prices: vec![vec![Pln(10.0)]; 3],
    };
    let request = PlanRequest {
        offices: vec![1],
        horizon_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        horizon_days: 3,
        initial_inventory_kg: HashMap::from([(1, Kilograms(0.0))]),
        demand: vec![DemandInput {
            office_id: 1,
            workers: vec![0, 0, 80],
            conferences: vec![0, 0, 0],
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
    let day0_order = result.orders.iter().find(|o| o.placement_day == 0);
    assert!(day0_order.is_some(), "an order to cover day 2 must be placed on day 0");
    assert_eq!(day0_order.unwrap().delivery_day, 2);
}

/// S5 (correction): a prior order of 30 kg on day 3 is adjusted up by 10 kg
/// under a `R_max=15`, `K=2 PLN/kg` correction policy, because extending
/// that order is cheaper than paying a second delivery's fixed cost.
#[test]
fn s5_correction_mode_adjusts_prior_order() {
    let office = office(500.0, 0.0);
    let distributor = Distributor {
        id: 1,
        name: "Acme".into(),
        fixed_delivery_cost: HashMap::from([(1, Pln(100.0))]),
        lead_time_days: HashMap::from([(1, 0)]),
        supply_cap_kg: vec![Kilograms(1000.0); 5],
        tier_thresholds_kg: vec![Kilograms(0.0)],
        tier_prices: vec![vec![Pln(10.0)]; 5],
    };
    let request = PlanRequest {
        offices: vec![1],
        horizon_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        horizon_days: 5,
        initial_inventory_kg: HashMap::from([(1, Kilograms(0.0))]),
        demand: vec![DemandInput {
            office_id: 1,
            workers: vec![0, 0, 0, 120, 40],
            conferences: vec![0, 0, 0, 0, 0],
        }],
        is_correction_mode: true,
        prior_plan_ref: Some(PriorPlanRef { plan_id: 1 }),
    };
    let prior_orders = vec![PriorPlanOrder {
        distributor_id: 1,
        office_id: 1,
        placement_day: 3,
        tier: 0,
        qty_kg: Kilograms(30.0),
    }];
    let mut correction = CorrectionConfig::default();
    correction.r_max_kg.insert((1, 1, 3), Kilograms(15.0));
    correction.k_cost_pln.insert((1, 1, 3), Pln(2.0));

    let result = plan_advanced(
        &request,
        &[office],
        &[distributor],
        &DemandConfig::default(),
        &prior_orders,
        Some(&correction),
        &SolverConfig::default(),
    )
    .unwrap();

    assert!(result.status.is_optimal());
    let day3_order = result
        .orders
        .iter()
        .find(|o| o.placement_day == 3)
        .expect("day 3 order survives correction");
    assert_relative_eq!(day3_order.qty_kg.value(), 40.0, epsilon = 1e-6);
}
