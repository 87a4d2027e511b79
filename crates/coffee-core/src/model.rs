//! The planning data model (spec §3): offices, distributors, demand
//! inputs, plan requests, and the durable records a plan produces.

use crate::units::{Kilograms, Pln};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type OfficeId = u32;
pub type DistributorId = u32;
pub type PlanId = u64;

/// An office/building. Mutable only by the admin flow surrounding the
/// core — never by the planner itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Office {
    pub id: OfficeId,
    pub name: String,
    /// `Vmax_b`, kg, > 0.
    pub capacity_kg: Kilograms,
    /// `alpha_b`, fraction of end-of-day inventory lost overnight, in [0,1].
    pub daily_loss_fraction: f64,
    pub active: bool,
}

/// A distributor's tariff, lead times, and supply caps.
///
/// Tier thresholds and per-day per-tier prices are shared across offices
/// (only `Cfix` and lead time vary per office); `tier_prices[t][l]` and
/// `tier_thresholds_kg` both have length `L+1` (index 0 is the base tier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distributor {
    pub id: DistributorId,
    pub name: String,
    /// `Cfix_{d,b}`, PLN, keyed by office.
    pub fixed_delivery_cost: HashMap<OfficeId, Pln>,
    /// `X_{d,b}`, integer days, keyed by office.
    pub lead_time_days: HashMap<OfficeId, u32>,
    /// `S_{d,t}`, kg, length T.
    pub supply_cap_kg: Vec<Kilograms>,
    /// `Q_0=0 < Q_1 < ... < Q_L`, length L+1.
    pub tier_thresholds_kg: Vec<Kilograms>,
    /// `P_{d,t,l}`, shape T x (L+1).
    pub tier_prices: Vec<Vec<Pln>>,
}

impl Distributor {
    /// Number of tiers above the base tier (`L`).
    pub fn num_tiers(&self) -> usize {
        self.tier_thresholds_kg.len().saturating_sub(1)
    }

    pub fn lead_time_for(&self, office: OfficeId) -> Option<u32> {
        self.lead_time_days.get(&office).copied()
    }

    pub fn fixed_cost_for(&self, office: OfficeId) -> Option<Pln> {
        self.fixed_delivery_cost.get(&office).copied()
    }
}

/// Per-office, per-day headcount and conference load feeding the demand
/// estimator (§4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandInput {
    pub office_id: OfficeId,
    /// `w_{b,t}`, length T.
    pub workers: Vec<u32>,
    /// `c_{b,t}`, length T.
    pub conferences: Vec<u32>,
}

/// Reference to a prior plan, required when `is_correction_mode` is set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriorPlanRef {
    pub plan_id: PlanId,
}

/// A previously committed order, reprojected onto the `(d, b, t, l)` index
/// for use as `x^kor` in a correction run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriorPlanOrder {
    pub distributor_id: DistributorId,
    pub office_id: OfficeId,
    /// Placement day relative to the *new* plan's horizon start; may be
    /// negative for historical commitments still in transit.
    pub placement_day: i64,
    /// Tier index `k` in `0..=L`.
    pub tier: u32,
    pub qty_kg: Kilograms,
}

/// A request to (re)plan procurement for a set of offices over a horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub offices: Vec<OfficeId>,
    pub horizon_start: NaiveDate,
    /// `T`, 1..=30.
    pub horizon_days: u32,
    /// `I0_b`, keyed by office.
    pub initial_inventory_kg: HashMap<OfficeId, Kilograms>,
    pub demand: Vec<DemandInput>,
    pub is_correction_mode: bool,
    pub prior_plan_ref: Option<PriorPlanRef>,
}

/// Outcome of a solve attempt (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SolverStatus {
    /// Optimal, or within the configured MIP gap. `gap_exceeded_target`
    /// is set when the time limit was hit with a feasible incumbent whose
    /// gap is above the configured target.
    Optimal { gap_exceeded_target: bool },
    Infeasible,
    TimedOut,
    SolverError { reason: String },
}

impl SolverStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverStatus::Optimal { .. })
    }
}

/// One planned order: office, distributor, placement/delivery day,
/// quantity, the unit price of the tier actually achieved, and costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIntent {
    pub office_id: OfficeId,
    pub distributor_id: DistributorId,
    pub placement_day: u32,
    pub delivery_day: u32,
    pub qty_kg: Kilograms,
    pub unit_price: Pln,
    pub tier_achieved: u32,
    pub transport_cost: Pln,
    pub total_cost: Pln,
}

/// Projected end-of-day inventory state for one office/day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub office_id: OfficeId,
    pub day: u32,
    pub level_kg: Kilograms,
    pub demand_fulfilled_kg: Kilograms,
    pub loss_kg: Kilograms,
    pub deliveries_received_kg: Kilograms,
    pub is_projected: bool,
}

/// The complete output of one planning request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    pub status: SolverStatus,
    /// Present iff `status` is `Optimal`.
    pub objective_pln: Option<Pln>,
    pub solve_ms: u64,
    /// Present iff `status` is `Optimal`.
    pub orders: Vec<OrderIntent>,
    /// Present iff `status` is `Optimal`.
    pub inventory: Vec<InventorySnapshot>,
}

impl PlanResult {
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Plan Result\n{}\n", "=".repeat(40)));
        match &self.status {
            SolverStatus::Optimal { gap_exceeded_target } => {
                s.push_str("Status: Optimal");
                if *gap_exceeded_target {
                    s.push_str(" (gap above target)");
                }
                s.push('\n');
            }
            SolverStatus::Infeasible => s.push_str("Status: Infeasible\n"),
            SolverStatus::TimedOut => s.push_str("Status: TimedOut\n"),
            SolverStatus::SolverError { reason } => {
                s.push_str(&format!("Status: SolverError ({reason})\n"))
            }
        }
        if let Some(obj) = self.objective_pln {
            s.push_str(&format!("Objective: {:.2} PLN\n", obj.value()));
        }
        s.push_str(&format!("Solve time: {} ms\n", self.solve_ms));
        s.push_str(&format!("Orders: {}\n", self.orders.len()));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributor_num_tiers() {
        let d = Distributor {
            id: 1,
            name: "Acme".into(),
            fixed_delivery_cost: HashMap::new(),
            lead_time_days: HashMap::new(),
            supply_cap_kg: vec![],
            tier_thresholds_kg: vec![Kilograms(0.0), Kilograms(20.0), Kilograms(50.0)],
            tier_prices: vec![],
        };
        assert_eq!(d.num_tiers(), 2);
    }

    #[test]
    fn summary_mentions_status() {
        let result = PlanResult {
            status: SolverStatus::Infeasible,
            objective_pln: None,
            solve_ms: 12,
            orders: vec![],
            inventory: vec![],
        };
        assert!(result.summary().contains("Infeasible"));
    }
}
