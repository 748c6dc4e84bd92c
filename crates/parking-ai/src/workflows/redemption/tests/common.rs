use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::tenants::{TenantDirectory, TenantId};
use crate::workflows::redemption::domain::{
    CouponApplication, CouponCategory, CouponDefinition, CouponKey, DayCalendar,
    InventorySnapshot, UsageSnapshot, VehicleId,
};
use crate::workflows::redemption::router::PlannerState;
use crate::workflows::redemption::service::{
    CouponExecutor, ExecutorError, GatewayError, PortalGateway, PortalSnapshot, RedemptionPlanner,
    RedemptionService,
};
use crate::workflows::redemption::CouponCatalog;

pub(super) fn key(value: &str) -> CouponKey {
    CouponKey::new(value)
}

pub(super) fn definition(
    key_name: &str,
    display_name: &str,
    category: CouponCategory,
    duration_minutes: u32,
    priority: i32,
) -> CouponDefinition {
    CouponDefinition {
        key: key(key_name),
        display_name: display_name.to_string(),
        category,
        duration_minutes,
        priority,
    }
}

/// The reference catalog: one free hour plus a half-hour paid coupon.
pub(super) fn mixed_catalog() -> CouponCatalog {
    CouponCatalog::new(vec![
        definition("free_1hour", "무료 1시간할인", CouponCategory::Free, 60, 0),
        definition("paid_30min", "유료 30분할인", CouponCategory::Paid, 30, 1),
    ])
    .expect("catalog builds")
}

pub(super) fn free_only_catalog() -> CouponCatalog {
    CouponCatalog::new(vec![definition(
        "free_1hour",
        "무료 1시간할인",
        CouponCategory::Free,
        60,
        0,
    )])
    .expect("catalog builds")
}

pub(super) fn weekend_catalog() -> CouponCatalog {
    CouponCatalog::new(vec![
        definition("free_1hour", "30분할인권(무료)", CouponCategory::Free, 60, 0),
        definition("paid_1hour", "1시간할인권(유료)", CouponCategory::Paid, 60, 1),
        definition(
            "weekend_1hour",
            "1시간주말할인권(유료)",
            CouponCategory::Weekend,
            60,
            2,
        ),
    ])
    .expect("catalog builds")
}

pub(super) fn usage_with_scoped(entries: &[(&str, u32)]) -> UsageSnapshot {
    let mut usage = UsageSnapshot::default();
    for (key_name, count) in entries {
        usage.record_scoped(key(key_name), *count);
    }
    usage
}

pub(super) fn inventory_with(entries: &[(&str, u32)]) -> InventorySnapshot {
    let mut inventory = InventorySnapshot::default();
    for (key_name, count) in entries {
        inventory.record(key(key_name), *count);
    }
    inventory
}

pub(super) fn well_stocked_inventory() -> InventorySnapshot {
    inventory_with(&[
        ("free_1hour", 99),
        ("paid_30min", 99),
        ("paid_1hour", 99),
        ("weekend_1hour", 99),
    ])
}

pub(super) fn vehicle() -> VehicleId {
    VehicleId("12가3456".to_string())
}

pub(super) fn planner() -> RedemptionPlanner {
    RedemptionPlanner::new(Arc::new(TenantDirectory::standard()))
}

/// Gateway double returning one scripted snapshot.
pub(super) struct ScriptedGateway {
    snapshot: PortalSnapshot,
}

impl ScriptedGateway {
    pub(super) fn new(usage: UsageSnapshot, inventory: InventorySnapshot) -> Self {
        Self {
            snapshot: PortalSnapshot { usage, inventory },
        }
    }
}

impl PortalGateway for ScriptedGateway {
    fn snapshot(
        &self,
        _tenant: TenantId,
        _vehicle: &VehicleId,
    ) -> Result<PortalSnapshot, GatewayError> {
        Ok(PortalSnapshot {
            usage: self.snapshot.usage.clone(),
            inventory: self.snapshot.inventory.clone(),
        })
    }
}

pub(super) struct UnavailableGateway;

impl PortalGateway for UnavailableGateway {
    fn snapshot(
        &self,
        _tenant: TenantId,
        _vehicle: &VehicleId,
    ) -> Result<PortalSnapshot, GatewayError> {
        Err(GatewayError::Unavailable("session expired".to_string()))
    }
}

/// Executor double recording what would have been clicked.
#[derive(Default)]
pub(super) struct RecordingExecutor {
    applied: Mutex<Vec<CouponApplication>>,
}

impl RecordingExecutor {
    pub(super) fn applied(&self) -> Vec<CouponApplication> {
        self.applied.lock().expect("executor mutex poisoned").clone()
    }
}

impl CouponExecutor for RecordingExecutor {
    fn apply(
        &self,
        _tenant: TenantId,
        _vehicle: &VehicleId,
        applications: &[CouponApplication],
    ) -> Result<(), ExecutorError> {
        self.applied
            .lock()
            .expect("executor mutex poisoned")
            .extend(applications.iter().cloned());
        Ok(())
    }
}

pub(super) struct RejectingExecutor;

impl CouponExecutor for RejectingExecutor {
    fn apply(
        &self,
        _tenant: TenantId,
        _vehicle: &VehicleId,
        _applications: &[CouponApplication],
    ) -> Result<(), ExecutorError> {
        Err(ExecutorError::Rejected("popup did not confirm".to_string()))
    }
}

pub(super) fn build_service(
    usage: UsageSnapshot,
    inventory: InventorySnapshot,
) -> (
    RedemptionService<ScriptedGateway, RecordingExecutor>,
    Arc<RecordingExecutor>,
) {
    let gateway = Arc::new(ScriptedGateway::new(usage, inventory));
    let executor = Arc::new(RecordingExecutor::default());
    let service = RedemptionService::new(
        Arc::new(TenantDirectory::standard()),
        gateway,
        executor.clone(),
    );
    (service, executor)
}

pub(super) fn planner_state() -> PlannerState {
    PlannerState {
        planner: Arc::new(planner()),
        calendar: Arc::new(DayCalendar::default()),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
