//! coffee-persistence: the external collaborator boundary (spec §3, §5,
//! §6). The planning core never performs I/O itself; this crate is the
//! narrow seam between a `PlanResult` and wherever it is durably recorded.
//!
//! `PlanStore` is the whole contract `coffee-planner` needs: one
//! transactional write (`store_plan`) and one read (`load_prior_orders`)
//! to resolve a correction run's prior commitments. Everything else in
//! spec §5's persistence layout — offices, distributors, users, system
//! parameters — belongs to the real collaborator (a database behind an
//! HTTP service) and is out of scope here; `InMemoryPlanStore` only seeds
//! enough of it to exercise the contract end to end in tests and the CLI.

use std::collections::HashMap;
use std::sync::Mutex;

use coffee_core::{
    CoreError, Distributor, DistributorId, InventorySnapshot, Office, OfficeId, OrderIntent,
    PlanId, PlanResult, PriorPlanOrder, PriorPlanRef,
};

/// The persistence contract `coffee-planner` depends on (spec §5's "core
/// only requires" list, minus the read-by-id on offices/distributors,
/// which callers resolve themselves before assembling a `PlanRequest`).
pub trait PlanStore {
    /// Durably record a plan's result, orders, and inventory snapshots as
    /// one all-or-nothing unit (spec §5: "no partial write is ever
    /// visible"). Returns the new plan's id.
    fn store_plan(
        &self,
        result: &PlanResult,
        orders: &[OrderIntent],
        snapshots: &[InventorySnapshot],
    ) -> Result<PlanId, CoreError>;

    /// Load the orders committed by a prior plan, for use as `x^kor` in a
    /// correction run. `CorrectionPreconditionFailed` (spec §7) if the
    /// referenced plan does not exist.
    fn load_prior_orders(&self, plan_ref: PriorPlanRef) -> Result<Vec<PriorPlanOrder>, CoreError>;
}

#[derive(Debug, Clone)]
struct StoredPlan {
    result: PlanResult,
    orders: Vec<OrderIntent>,
    snapshots: Vec<InventorySnapshot>,
}

/// A `Mutex<HashMap<...>>`-backed reference implementation, sufficient for
/// the CLI and for tests exercising correction mode end to end. Not meant
/// for concurrent multi-process use — the real collaborator is a database.
#[derive(Default)]
pub struct InMemoryPlanStore {
    plans: Mutex<HashMap<PlanId, StoredPlan>>,
    next_id: Mutex<PlanId>,
    offices: Mutex<HashMap<OfficeId, Office>>,
    distributors: Mutex<HashMap<DistributorId, Distributor>>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self {
            plans: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
            offices: Mutex::new(HashMap::new()),
            distributors: Mutex::new(HashMap::new()),
        }
    }

    /// Seed the catalog the CLI reads offices/distributors from. Not part
    /// of [`PlanStore`]: a real collaborator exposes this via its own
    /// database tables (spec §5), not through the planning contract.
    pub fn seed_office(&self, office: Office) {
        self.offices.lock().unwrap().insert(office.id, office);
    }

    pub fn seed_distributor(&self, distributor: Distributor) {
        self.distributors
            .lock()
            .unwrap()
            .insert(distributor.id, distributor);
    }

    pub fn office(&self, id: OfficeId) -> Option<Office> {
        self.offices.lock().unwrap().get(&id).cloned()
    }

    pub fn offices(&self, ids: &[OfficeId]) -> Result<Vec<Office>, CoreError> {
        let catalog = self.offices.lock().unwrap();
        ids.iter()
            .map(|id| {
                catalog
                    .get(id)
                    .cloned()
                    .ok_or_else(|| CoreError::invalid("offices", format!("unknown office id {id}")))
            })
            .collect()
    }

    pub fn all_distributors(&self) -> Vec<Distributor> {
        self.distributors.lock().unwrap().values().cloned().collect()
    }

    pub fn plan(&self, id: PlanId) -> Option<PlanResult> {
        self.plans.lock().unwrap().get(&id).map(|p| p.result.clone())
    }
}

impl PlanStore for InMemoryPlanStore {
    fn store_plan(
        &self,
        result: &PlanResult,
        orders: &[OrderIntent],
        snapshots: &[InventorySnapshot],
    ) -> Result<PlanId, CoreError> {
        let stored = StoredPlan {
            result: result.clone(),
            orders: orders.to_vec(),
            snapshots: snapshots.to_vec(),
        };

        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        self.plans.lock().unwrap().insert(id, stored);
        *next_id += 1;
        Ok(id)
    }

    fn load_prior_orders(&self, plan_ref: PriorPlanRef) -> Result<Vec<PriorPlanOrder>, CoreError> {
        let plans = self.plans.lock().unwrap();
        let stored = plans.get(&plan_ref.plan_id).ok_or_else(|| {
            CoreError::CorrectionPreconditionFailed(format!(
                "no plan with id {}",
                plan_ref.plan_id
            ))
        })?;

        Ok(stored
            .orders
            .iter()
            .map(|order| PriorPlanOrder {
                distributor_id: order.distributor_id,
                office_id: order.office_id,
                placement_day: order.placement_day as i64,
                tier: order.tier_achieved,
                qty_kg: order.qty_kg,
            })
            .collect())
    }
}
