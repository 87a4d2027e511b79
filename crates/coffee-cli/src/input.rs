//! On-disk request format for the CLI. `coffee-planner` never reads JSON
//! itself — persistence and request parsing are collaborator concerns
//! (spec §1) — so this module is where that JSON-in shape lives, the same
//! boundary `gat_cli::commands::tep`'s `CandidateInput` draws around
//! `gat-algo`.

use std::path::Path;

use anyhow::{Context, Result};
use coffee_core::{Distributor, Kilograms, Office, Pln, PlanRequest, PriorPlanOrder};
use coffee_planner::assembly::CorrectionConfig;
use coffee_planner::demand::DemandConfig;
use serde::Deserialize;

/// One `(distributor, office, day)` correction coefficient, flattened
/// because JSON object keys can't carry a tuple.
#[derive(Debug, Deserialize)]
pub struct CorrectionEntry {
    pub distributor_id: u32,
    pub office_id: u32,
    pub day: usize,
    pub value: f64,
}

#[derive(Debug, Deserialize, Default)]
pub struct CorrectionInput {
    #[serde(default)]
    pub r_max_kg: Vec<CorrectionEntry>,
    #[serde(default)]
    pub k_cost_pln: Vec<CorrectionEntry>,
}

impl From<CorrectionInput> for CorrectionConfig {
    fn from(value: CorrectionInput) -> Self {
        let mut config = CorrectionConfig::default();
        for entry in value.r_max_kg {
            config
                .r_max_kg
                .insert((entry.distributor_id, entry.office_id, entry.day), Kilograms(entry.value));
        }
        for entry in value.k_cost_pln {
            config
                .k_cost_pln
                .insert((entry.distributor_id, entry.office_id, entry.day), Pln(entry.value));
        }
        config
    }
}

/// The whole file a `plan`/`replan` invocation reads: the request itself
/// plus the `Office`/`Distributor` catalog entries and (for correction
/// runs) the prior plan's orders and correction coefficients. A real
/// deployment resolves these from its own database (spec §5); the CLI
/// bundles them into one file since it has no persistence layer to query.
#[derive(Debug, Deserialize)]
pub struct PlanInputFile {
    pub request: PlanRequest,
    pub offices: Vec<Office>,
    pub distributors: Vec<Distributor>,
    #[serde(default)]
    pub demand_config: Option<DemandConfigInput>,
    #[serde(default)]
    pub prior_orders: Vec<PriorPlanOrder>,
    #[serde(default)]
    pub correction: Option<CorrectionInput>,
}

#[derive(Debug, Deserialize)]
pub struct DemandConfigInput {
    pub kg_per_worker: f64,
    pub conference_multiplier: f64,
}

impl From<DemandConfigInput> for DemandConfig {
    fn from(value: DemandConfigInput) -> Self {
        DemandConfig {
            kg_per_worker: value.kg_per_worker,
            conference_multiplier: value.conference_multiplier,
        }
    }
}

pub fn load(path: &Path) -> Result<PlanInputFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading plan input file: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing plan input file: {}", path.display()))
}

