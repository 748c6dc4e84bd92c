//! Coupon redemption planning.
//!
//! The modules here split the decision pipeline the way it is tested: the
//! allocation passes compute ideal demand with no inventory awareness, the
//! clipper reconciles that demand with stock, and the validator reports
//! whether what survived still covers the target. Everything is a pure
//! function over immutable snapshots; the service module wires the pipeline
//! to the scraping-layer seams.

pub mod allocation;
pub mod catalog;
pub mod domain;
pub mod inventory;
pub mod router;
pub mod service;
pub mod snapshot;
pub mod validator;

#[cfg(test)]
mod tests;

pub use allocation::allocate;
pub use catalog::{CatalogError, CouponCatalog};
pub use domain::{
    AllocationEntry, AllocationResult, CouponApplication, CouponCategory, CouponDefinition,
    CouponKey, DayCalendar, DayKind, DiscountTarget, InventorySnapshot, UsageSnapshot, VehicleId,
};
pub use inventory::clip;
pub use router::{redemption_router, PlannerState};
pub use service::{
    CouponExecutor, ExecutorError, GatewayError, PortalGateway, PortalSnapshot, RedemptionError,
    RedemptionOutcome, RedemptionPlan, RedemptionPlanner, RedemptionService,
};
pub use snapshot::{
    inventory_from_path, inventory_from_reader, usage_from_path, usage_from_reader,
    SnapshotImportError,
};
pub use validator::meets_target;
