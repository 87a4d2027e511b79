//! Parameter Assembly & Validation (spec §4.2).
//!
//! Takes a [`PlanRequest`] plus externally-fetched [`Office`]/[`Distributor`]
//! records (fetched by the collaborator, never by this crate — persistence
//! I/O stays out of `coffee-planner` entirely) and produces the dense,
//! validated parameter set the MILP builder consumes. Every invariant in
//! spec §3's entity table and §4.2's validation list is checked here; the
//! first violation is returned as `CoreError::InvalidInput` naming the
//! offending field.

use coffee_core::{
    CoreError, CoreResult, DemandInput, Diagnostics, Distributor, DistributorId, Kilograms,
    Office, OfficeId, Pln, PlanRequest, PriorPlanOrder,
};
use std::collections::HashMap;

use crate::demand::{compute_big_m, estimate_demand, DemandConfig};

/// A distributor's tariff padded to the aligned, widest tier count `L`
/// across all distributors in the request (spec §9 open question (a)).
/// Padding repeats the last real threshold (zero-width extra tiers, so
/// they can never bind) and the last real price.
#[derive(Debug, Clone)]
pub struct AlignedDistributor {
    pub id: DistributorId,
    pub fixed_delivery_cost: HashMap<OfficeId, Pln>,
    pub lead_time_days: HashMap<OfficeId, u32>,
    /// Length T.
    pub supply_cap_kg: Vec<Kilograms>,
    /// Length `num_tiers + 1`.
    pub tier_thresholds_kg: Vec<Kilograms>,
    /// Shape `T x (num_tiers + 1)`.
    pub tier_prices: Vec<Vec<Pln>>,
}

impl AlignedDistributor {
    pub fn lead_time_for(&self, office: OfficeId) -> Option<u32> {
        self.lead_time_days.get(&office).copied()
    }

    pub fn fixed_cost_for(&self, office: OfficeId) -> Option<Pln> {
        self.fixed_delivery_cost.get(&office).copied()
    }
}

/// Correction-mode cost coefficients and caps, keyed by `(distributor,
/// office, day)`. Supplied alongside the prior plan's orders; not part of
/// [`PlanRequest`] itself because they belong to the correction policy,
/// not to the physical planning request.
#[derive(Debug, Clone, Default)]
pub struct CorrectionConfig {
    pub r_max_kg: HashMap<(DistributorId, OfficeId, usize), Kilograms>,
    pub k_cost_pln: HashMap<(DistributorId, OfficeId, usize), Pln>,
}

/// Resolved correction inputs, indexed onto `(d, b, t, tier)` per spec
/// §4.3 constraint 7/8, ready for the MILP builder.
#[derive(Debug, Clone, Default)]
pub struct CorrectionParameters {
    /// `x^{kor,k}_{d,b,t}`, missing entries default to 0 kg.
    pub x_kor: HashMap<(DistributorId, OfficeId, usize, u32), Kilograms>,
    pub r_max_kg: HashMap<(DistributorId, OfficeId, usize), Kilograms>,
    pub k_cost_pln: HashMap<(DistributorId, OfficeId, usize), Pln>,
}

/// The full assembled, validated input to `build_advanced` (spec §4.3).
#[derive(Debug, Clone)]
pub struct AdvancedParameters {
    pub offices: Vec<Office>,
    pub distributors: Vec<AlignedDistributor>,
    /// `T`.
    pub horizon_days: usize,
    /// `L`, aligned to the widest distributor.
    pub num_tiers: usize,
    /// `D_{b,t}`, keyed by office, length T.
    pub demand_kg: HashMap<OfficeId, Vec<Kilograms>>,
    pub initial_inventory_kg: HashMap<OfficeId, Kilograms>,
    /// Arrivals at `(office, day)` from commitments placed before the
    /// horizon started (spec §4.3 constraint 1, §9 open question (b)).
    pub historical_arrivals_kg: HashMap<(OfficeId, usize), Kilograms>,
    pub big_m: Kilograms,
    pub correction: Option<CorrectionParameters>,
}

/// Input to `build_baseline`: single office, single distributor, no tiers.
#[derive(Debug, Clone)]
pub struct BaselineParameters {
    pub office: Office,
    /// `P_t`, length T.
    pub price_pln_per_kg: Vec<Pln>,
    pub transport_cost_pln: Pln,
    /// `D_t`, length T.
    pub demand_kg: Vec<Kilograms>,
    pub initial_inventory_kg: Kilograms,
}

fn require(cond: bool, field: &str, reason: &str) -> CoreResult<()> {
    if cond {
        Ok(())
    } else {
        Err(CoreError::invalid(field, reason))
    }
}

fn find_office<'a>(offices: &'a [Office], id: OfficeId) -> CoreResult<&'a Office> {
    offices
        .iter()
        .find(|o| o.id == id)
        .ok_or_else(|| CoreError::invalid("offices", format!("unknown office id {id}")))
}

fn find_demand<'a>(demand: &'a [DemandInput], office_id: OfficeId) -> CoreResult<&'a DemandInput> {
    demand
        .iter()
        .find(|d| d.office_id == office_id)
        .ok_or_else(|| CoreError::invalid("demand", format!("missing demand input for office {office_id}")))
}

fn validate_distributor(d: &Distributor, horizon_days: usize) -> CoreResult<()> {
    require(
        d.supply_cap_kg.len() == horizon_days,
        "supply_cap_kg",
        "length must equal horizon_days",
    )?;
    require(
        !d.tier_thresholds_kg.is_empty() && d.tier_thresholds_kg[0].value() == 0.0,
        "tier_thresholds_kg",
        "must start at Q_0 = 0",
    )?;
    for window in d.tier_thresholds_kg.windows(2) {
        require(
            window[1].value() > window[0].value(),
            "tier_thresholds_kg",
            "thresholds must be strictly increasing",
        )?;
    }
    require(
        d.tier_prices.len() == horizon_days,
        "tier_prices",
        "must have one row per horizon day",
    )?;
    for row in &d.tier_prices {
        require(
            row.len() == d.tier_thresholds_kg.len(),
            "tier_prices",
            "each day's row must cover every tier",
        )?;
        for price in row {
            require(price.value() >= 0.0, "tier_prices", "prices must be non-negative")?;
        }
    }
    for cap in &d.supply_cap_kg {
        require(cap.value() >= 0.0, "supply_cap_kg", "supply caps must be non-negative")?;
    }
    for cost in d.fixed_delivery_cost.values() {
        require(cost.value() >= 0.0, "fixed_delivery_cost", "must be non-negative")?;
    }
    Ok(())
}

/// Pad a distributor's tiered tariff out to `target_tiers` (the widest `L`
/// across the request), per spec §9 open question (a).
fn align_distributor(d: &Distributor, horizon_days: usize, target_tiers: usize) -> AlignedDistributor {
    let mut thresholds = d.tier_thresholds_kg.clone();
    let last_threshold = *thresholds.last().expect("validated non-empty");
    while thresholds.len() < target_tiers + 1 {
        thresholds.push(last_threshold);
    }

    let mut prices = Vec::with_capacity(horizon_days);
    for row in &d.tier_prices {
        let mut padded = row.clone();
        let last_price = *padded.last().expect("validated non-empty");
        while padded.len() < target_tiers + 1 {
            padded.push(last_price);
        }
        prices.push(padded);
    }

    AlignedDistributor {
        id: d.id,
        fixed_delivery_cost: d.fixed_delivery_cost.clone(),
        lead_time_days: d.lead_time_days.clone(),
        supply_cap_kg: d.supply_cap_kg.clone(),
        tier_thresholds_kg: thresholds,
        tier_prices: prices,
    }
}

/// Resolve historical arrivals and (in correction mode) `x^kor`, from a
/// prior plan's committed orders. Spec §9(b): the historical-arrival
/// window is every `τ<0` with `τ + X_{d,b} ∈ [0,T)`, tighter than the
/// original implementation's fixed `-100..-1` sweep.
fn resolve_prior_orders(
    prior_orders: &[PriorPlanOrder],
    distributors: &[Distributor],
    horizon_days: usize,
    is_correction_mode: bool,
) -> (HashMap<(OfficeId, usize), Kilograms>, HashMap<(DistributorId, OfficeId, usize, u32), Kilograms>) {
    let mut historical: HashMap<(OfficeId, usize), Kilograms> = HashMap::new();
    let mut x_kor: HashMap<(DistributorId, OfficeId, usize, u32), Kilograms> = HashMap::new();

    for order in prior_orders {
        let lead_time = distributors
            .iter()
            .find(|d| d.id == order.distributor_id)
            .and_then(|d| d.lead_time_for(order.office_id))
            .unwrap_or(0) as i64;

        if order.placement_day < 0 {
            let arrival = order.placement_day + lead_time;
            if arrival >= 0 && arrival < horizon_days as i64 {
                let key = (order.office_id, arrival as usize);
                *historical.entry(key).or_insert(Kilograms(0.0)) += order.qty_kg;
            }
        } else if is_correction_mode && order.placement_day < horizon_days as i64 {
            let key = (order.distributor_id, order.office_id, order.placement_day as usize, order.tier);
            *x_kor.entry(key).or_insert(Kilograms(0.0)) += order.qty_kg;
        }
    }

    (historical, x_kor)
}

/// Assemble and validate the advanced-formulation parameters.
#[allow(clippy::too_many_arguments)]
pub fn assemble_advanced(
    request: &PlanRequest,
    offices: &[Office],
    distributors: &[Distributor],
    demand_config: &DemandConfig,
    prior_orders: &[PriorPlanOrder],
    correction_config: Option<&CorrectionConfig>,
) -> CoreResult<(AdvancedParameters, Diagnostics)> {
    let mut diagnostics = Diagnostics::new();
    let t = request.horizon_days as usize;

    require(
        (1..=30).contains(&request.horizon_days),
        "horizon_days",
        "must be in 1..=30",
    )?;
    require(!request.offices.is_empty(), "offices", "at least one office is required")?;
    require(!distributors.is_empty(), "distributors", "at least one distributor is required")?;

    if request.is_correction_mode && request.prior_plan_ref.is_none() {
        return Err(CoreError::invalid(
            "prior_plan_ref",
            "required when is_correction_mode is set",
        ));
    }

    let mut resolved_offices = Vec::with_capacity(request.offices.len());
    let mut demand_kg = HashMap::new();
    let mut initial_inventory_kg = HashMap::new();

    for &office_id in &request.offices {
        let office = find_office(offices, office_id)?.clone();
        require(
            office.capacity_kg.value() > 0.0,
            "capacity_kg",
            "office capacity must be > 0",
        )?;
        require(
            (0.0..=1.0).contains(&office.daily_loss_fraction),
            "daily_loss_fraction",
            "must be in [0,1]",
        )?;

        let demand_input = find_demand(&request.demand, office_id)?;
        require(
            demand_input.workers.len() == t,
            "demand.workers",
            "length must equal horizon_days",
        )?;
        require(
            demand_input.conferences.len() == t,
            "demand.conferences",
            "length must equal horizon_days",
        )?;

        let demand_series: Vec<Kilograms> = (0..t)
            .map(|i| estimate_demand(demand_config, demand_input.workers[i], demand_input.conferences[i]))
            .collect();

        let i0 = request
            .initial_inventory_kg
            .get(&office_id)
            .copied()
            .ok_or_else(|| CoreError::invalid("initial_inventory_kg", format!("missing entry for office {office_id}")))?;
        require(i0.value() >= 0.0, "initial_inventory_kg", "must be non-negative")?;

        if !office.active {
            diagnostics.add_warning_with_entity(
                "office",
                "office is inactive but included in the plan request",
                office_id.to_string(),
            );
        }

        demand_kg.insert(office_id, demand_series);
        initial_inventory_kg.insert(office_id, i0);
        resolved_offices.push(office);
    }

    for d in distributors {
        validate_distributor(d, t)?;
        if resolved_offices.iter().all(|o| d.lead_time_for(o.id).is_none()) {
            diagnostics.add_warning_with_entity(
                "distributor",
                "distributor has no lead time for any requested office",
                d.id.to_string(),
            );
        }
    }

    let target_tiers = distributors.iter().map(|d| d.num_tiers()).max().unwrap_or(0);
    let aligned: Vec<AlignedDistributor> = distributors
        .iter()
        .map(|d| align_distributor(d, t, target_tiers))
        .collect();

    let big_m = compute_big_m(distributors);

    let (historical_arrivals_kg, x_kor) =
        resolve_prior_orders(prior_orders, distributors, t, request.is_correction_mode);

    let correction = if request.is_correction_mode {
        let config = correction_config.ok_or_else(|| {
            CoreError::invalid("correction_config", "required when is_correction_mode is set")
        })?;
        for ((d_id, b_id, day), cap) in &config.r_max_kg {
            require(cap.value() >= 0.0, "r_max_kg", "correction cap must be non-negative")?;
            require(*day < t, "r_max_kg", "day index out of horizon range")?;
            let _ = (d_id, b_id);
        }
        for cost in config.k_cost_pln.values() {
            require(cost.value() >= 0.0, "k_cost_pln", "correction cost must be non-negative")?;
        }
        Some(CorrectionParameters {
            x_kor,
            r_max_kg: config.r_max_kg.clone(),
            k_cost_pln: config.k_cost_pln.clone(),
        })
    } else {
        None
    };

    Ok((
        AdvancedParameters {
            offices: resolved_offices,
            distributors: aligned,
            horizon_days: t,
            num_tiers: target_tiers,
            demand_kg,
            initial_inventory_kg,
            historical_arrivals_kg,
            big_m,
            correction,
        },
        diagnostics,
    ))
}

/// Assemble the baseline-formulation parameters: a single office, a flat
/// per-day price array, and one transport cost (spec §4.3 "Baseline
/// formulation").
pub fn assemble_baseline(
    office: &Office,
    price_pln_per_kg: &[Pln],
    transport_cost_pln: Pln,
    demand_config: &DemandConfig,
    demand: &DemandInput,
    initial_inventory_kg: Kilograms,
    horizon_days: usize,
) -> CoreResult<BaselineParameters> {
    require(
        (1..=30).contains(&(horizon_days as u32)),
        "horizon_days",
        "must be in 1..=30",
    )?;
    require(
        price_pln_per_kg.len() == horizon_days,
        "purchase_costs_pln_per_kg_daily",
        "length must equal horizon_days",
    )?;
    require(
        demand.workers.len() == horizon_days && demand.conferences.len() == horizon_days,
        "demand",
        "length must equal horizon_days",
    )?;
    require(
        office.capacity_kg.value() > 0.0,
        "storage_capacity_kg",
        "must be > 0",
    )?;
    require(
        (0.0..=1.0).contains(&office.daily_loss_fraction),
        "daily_loss_fraction",
        "must be in [0,1]",
    )?;
    require(transport_cost_pln.value() >= 0.0, "transport_cost_pln", "must be non-negative")?;
    require(initial_inventory_kg.value() >= 0.0, "initial_inventory_kg", "must be non-negative")?;
    for price in price_pln_per_kg {
        require(price.value() >= 0.0, "purchase_costs_pln_per_kg_daily", "must be non-negative")?;
    }

    let demand_kg = (0..horizon_days)
        .map(|i| estimate_demand(demand_config, demand.workers[i], demand.conferences[i]))
        .collect();

    Ok(BaselineParameters {
        office: office.clone(),
        price_pln_per_kg: price_pln_per_kg.to_vec(),
        transport_cost_pln,
        demand_kg,
        initial_inventory_kg,
    })
}
