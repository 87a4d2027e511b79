//! Demand Estimator (spec §4.1).
//!
//! Deterministic, side-effect-free: the same `(workers, conferences)` pair
//! always yields the same kilograms. Nothing here may draw from an RNG —
//! the one place that injects noise, [`MockForecaster`], is compiled only
//! behind the `mock-forecaster` feature and is never on the planning path.

use coffee_core::{Distributor, Kilograms};

/// Tunable constants for the demand model, kept as configuration rather
/// than inline literals so a deployment can recalibrate without a rebuild
/// of the formula itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandConfig {
    /// `ρ`: kilograms of coffee consumed per worker per day.
    pub kg_per_worker: f64,
    /// `μ`: multiplicative demand factor per conference held that day.
    pub conference_multiplier: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            kg_per_worker: 0.25,
            conference_multiplier: 1.2,
        }
    }
}

/// `D_{b,t} = w_{b,t} * rho * mu^{c_{b,t}}`.
pub fn estimate_demand(config: &DemandConfig, workers: u32, conferences: u32) -> Kilograms {
    let base = workers as f64 * config.kg_per_worker;
    let factor = config.conference_multiplier.powi(conferences as i32);
    Kilograms(base * factor)
}

/// Estimate demand for every day in a `(workers, conferences)` series.
pub fn estimate_demand_series(config: &DemandConfig, workers: &[u32], conferences: &[u32]) -> Vec<Kilograms> {
    workers
        .iter()
        .zip(conferences.iter())
        .map(|(&w, &c)| estimate_demand(config, w, c))
        .collect()
}

/// Largest supply cap across all distributor/day pairs, used as the
/// activation constant (`BigM`) in the MILP builder's order-placement
/// linking constraints.
pub fn compute_big_m(distributors: &[Distributor]) -> Kilograms {
    distributors
        .iter()
        .flat_map(|d| d.supply_cap_kg.iter().copied())
        .fold(Kilograms(0.0), Kilograms::max)
}

/// Demo-only forecaster that injects bounded multiplicative noise around
/// the deterministic estimate. Explicitly **not** reproducible and never
/// invoked from [`crate::assembly`] or the MILP builder — it exists purely
/// so a demo UI can show forecast variance without polluting the planning
/// path with randomness.
#[cfg(feature = "mock-forecaster")]
pub struct MockForecaster {
    config: DemandConfig,
    noise_fraction: f64,
}

#[cfg(feature = "mock-forecaster")]
impl MockForecaster {
    pub fn new(config: DemandConfig, noise_fraction: f64) -> Self {
        Self {
            config,
            noise_fraction: noise_fraction.clamp(0.0, 1.0),
        }
    }

    /// Sample a noisy demand estimate. Non-reproducible by design: callers
    /// needing deterministic behavior must use [`estimate_demand`] instead.
    pub fn sample(&self, rng: &mut impl rand::Rng, workers: u32, conferences: u32) -> Kilograms {
        let base = estimate_demand(&self.config, workers, conferences);
        let noise = rng.gen_range(-self.noise_fraction..=self.noise_fraction);
        Kilograms((base.value() * (1.0 + noise)).max(0.0))
    }
}
