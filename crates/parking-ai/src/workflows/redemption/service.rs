use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::allocation::allocate;
use super::domain::{
    AllocationResult, CouponApplication, DayKind, InventorySnapshot, UsageSnapshot, VehicleId,
};
use super::inventory::clip;
use super::validator::meets_target;
use crate::tenants::{TenantDirectory, TenantId};

/// Usage and inventory as read in one portal round-trip for one vehicle.
#[derive(Debug, Clone, Default)]
pub struct PortalSnapshot {
    pub usage: UsageSnapshot,
    pub inventory: InventorySnapshot,
}

/// Read seam implemented by the scraping layer: log in, find the vehicle,
/// and parse its history and stock tables.
pub trait PortalGateway: Send + Sync {
    fn snapshot(
        &self,
        tenant: TenantId,
        vehicle: &VehicleId,
    ) -> Result<PortalSnapshot, GatewayError>;
}

/// Write seam implemented by the scraping layer: click through the planned
/// applications on the portal.
pub trait CouponExecutor: Send + Sync {
    fn apply(
        &self,
        tenant: TenantId,
        vehicle: &VehicleId,
        applications: &[CouponApplication],
    ) -> Result<(), ExecutorError>;
}

/// Errors surfaced by the portal read seam.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("portal login failed: {0}")]
    LoginFailed(String),
    #[error("vehicle '{0}' not found")]
    VehicleNotFound(String),
    #[error("portal unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the portal write seam.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("coupon application rejected by portal: {0}")]
    Rejected(String),
    #[error("portal unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by planning or the redemption run.
#[derive(Debug, thiserror::Error)]
pub enum RedemptionError {
    #[error("no profile registered for tenant '{0}'")]
    UnknownTenant(TenantId),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Everything one planning run decided, before any portal interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionPlan {
    pub tenant: TenantId,
    pub day: DayKind,
    /// The day's target for this tenant.
    pub target_minutes: u32,
    /// Minutes already granted according to the scoped history.
    pub current_minutes: u32,
    /// Raw demand before inventory clipping.
    pub requested: AllocationResult,
    /// Stock-clipped applications, the externally actionable list.
    pub applications: Vec<CouponApplication>,
    /// Minutes the clipped applications would add.
    pub projected_minutes: u32,
    /// Whether the clipped applications cover the gap that was open before
    /// this run. False means stock fell short (or the catalog had no
    /// suitable coupon) and the orchestrator may want to alert.
    pub target_met: bool,
}

impl RedemptionPlan {
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

/// Result of a full fetch-plan-execute run for one vehicle.
#[derive(Debug)]
pub struct RedemptionOutcome {
    pub plan: RedemptionPlan,
    pub executed: bool,
}

/// Pure planning facade over the tenant directory. Holds no per-call state;
/// concurrent calls for different vehicles are independent.
#[derive(Debug, Clone)]
pub struct RedemptionPlanner {
    directory: Arc<TenantDirectory>,
}

impl RedemptionPlanner {
    pub fn new(directory: Arc<TenantDirectory>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &TenantDirectory {
        &self.directory
    }

    /// Computes the plan for one vehicle snapshot. Deterministic and free of
    /// side effects; never errors on well-formed numeric input.
    pub fn plan(
        &self,
        tenant: TenantId,
        usage: &UsageSnapshot,
        inventory: &InventorySnapshot,
        day: DayKind,
    ) -> Result<RedemptionPlan, RedemptionError> {
        let profile = self
            .directory
            .get(tenant)
            .ok_or(RedemptionError::UnknownTenant(tenant))?;

        let usage = profile.effective_usage(usage);
        let target_minutes = profile.target.minutes_for(day);

        let current: u64 = profile
            .catalog
            .definitions()
            .iter()
            .map(|definition| {
                u64::from(usage.scoped_count(&definition.key))
                    * u64::from(definition.duration_minutes)
            })
            .sum();
        let gap = u64::from(target_minutes).saturating_sub(current);

        let requested = allocate(target_minutes, &profile.catalog, &usage, day);
        let applications = clip(&requested, inventory, &profile.catalog);

        let projected: u64 = applications
            .iter()
            .map(|application| {
                u64::from(application.count)
                    * u64::from(
                        profile
                            .catalog
                            .duration_minutes(&application.key)
                            .unwrap_or(0),
                    )
            })
            .sum();

        // The gap (not the full target) is what this run had to cover:
        // minutes granted on earlier runs stay granted.
        let target_met = meets_target(&applications, &profile.catalog, clamp_u32(gap));

        Ok(RedemptionPlan {
            tenant,
            day,
            target_minutes,
            current_minutes: clamp_u32(current),
            requested,
            applications,
            projected_minutes: clamp_u32(projected),
            target_met,
        })
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Service composing the planner with the scraping-layer seams.
pub struct RedemptionService<G, E> {
    planner: RedemptionPlanner,
    gateway: Arc<G>,
    executor: Arc<E>,
}

impl<G, E> RedemptionService<G, E>
where
    G: PortalGateway + 'static,
    E: CouponExecutor + 'static,
{
    pub fn new(directory: Arc<TenantDirectory>, gateway: Arc<G>, executor: Arc<E>) -> Self {
        Self {
            planner: RedemptionPlanner::new(directory),
            gateway,
            executor,
        }
    }

    pub fn planner(&self) -> &RedemptionPlanner {
        &self.planner
    }

    /// Fetches the vehicle's snapshot, plans, and executes any applications.
    ///
    /// An empty plan means the target is already met (or nothing can help)
    /// and skips the portal entirely. A plan that falls short of the target
    /// is still executed — partial discounts are better than none — with a
    /// warning for the orchestrator to pick up.
    pub fn run(
        &self,
        tenant: TenantId,
        vehicle: &VehicleId,
        day: DayKind,
    ) -> Result<RedemptionOutcome, RedemptionError> {
        let snapshot = self.gateway.snapshot(tenant, vehicle)?;
        let plan = self
            .planner
            .plan(tenant, &snapshot.usage, &snapshot.inventory, day)?;

        if plan.is_empty() {
            info!(%tenant, %vehicle, "nothing further to redeem");
            return Ok(RedemptionOutcome {
                plan,
                executed: false,
            });
        }

        if !plan.target_met {
            warn!(
                %tenant,
                %vehicle,
                target_minutes = plan.target_minutes,
                projected_minutes = plan.projected_minutes,
                "stock does not cover the remaining gap; applying what is available"
            );
        }

        self.executor.apply(tenant, vehicle, &plan.applications)?;

        info!(
            %tenant,
            %vehicle,
            applications = plan.applications.len(),
            projected_minutes = plan.projected_minutes,
            "coupon applications executed"
        );

        Ok(RedemptionOutcome {
            plan,
            executed: true,
        })
    }
}
