//! coffee-core: data model for the coffee procurement planning pipeline.
//!
//! This crate owns the entities and invariants of spec §3 — offices,
//! distributors, demand inputs, plan requests, and the durable records a
//! plan produces — along with unit-safe quantities and the error/
//! diagnostics types shared across the rest of the workspace. It has no
//! knowledge of the MILP formulation or of any solver; that lives in
//! `coffee-planner`.

pub mod diagnostics;
pub mod error;
pub mod model;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{CoreError, CoreResult};
pub use model::{
    DemandInput, Distributor, DistributorId, InventorySnapshot, Office, OfficeId, OrderIntent,
    PlanId, PlanRequest, PlanResult, PriorPlanOrder, PriorPlanRef, SolverStatus,
};
pub use units::{Kilograms, Pln};
