use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::domain::{
    CouponDefinition, DayCalendar, DayKind, InventorySnapshot, UsageSnapshot,
};
use super::service::{RedemptionPlan, RedemptionPlanner};
use crate::tenants::{TenantId, TenantProfile};

/// Planner plus the deployment calendar used when requests pass a date.
#[derive(Clone)]
pub struct PlannerState {
    pub planner: Arc<RedemptionPlanner>,
    pub calendar: Arc<DayCalendar>,
}

/// Router builder exposing the planning endpoints.
pub fn redemption_router(state: PlannerState) -> Router {
    Router::new()
        .route("/api/v1/redemption/:tenant/plan", post(plan_handler))
        .route("/api/v1/redemption/:tenant/catalog", get(catalog_handler))
        .with_state(state)
}

/// Snapshot maps keyed by whatever the scraper saw: display names, legacy
/// aliases, or canonical keys. The tenant adapter sorts them out.
#[derive(Debug, Deserialize)]
pub(crate) struct PlanRequest {
    #[serde(default)]
    pub(crate) date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) is_weekday: Option<bool>,
    #[serde(default)]
    pub(crate) outlet_history: BTreeMap<String, u32>,
    #[serde(default)]
    pub(crate) all_history: BTreeMap<String, u32>,
    #[serde(default)]
    pub(crate) inventory: BTreeMap<String, u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlanResponse {
    #[serde(flatten)]
    pub(crate) plan: RedemptionPlan,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogResponse {
    pub(crate) tenant: TenantId,
    pub(crate) weekday_target_minutes: u32,
    pub(crate) weekend_target_minutes: u32,
    pub(crate) coupons: Vec<CouponDefinition>,
}

pub(crate) async fn plan_handler(
    State(state): State<PlannerState>,
    Path(tenant): Path<String>,
    axum::Json(request): axum::Json<PlanRequest>,
) -> Response {
    let Some(tenant) = TenantId::from_slug(&tenant) else {
        return unknown_tenant_response(&tenant);
    };
    let Some(profile) = state.planner.directory().get(tenant) else {
        return unknown_tenant_response(tenant.as_str());
    };

    let day = resolve_day(&request, &state.calendar);
    let (usage, inventory) = snapshots_from_request(&request, profile);

    match state.planner.plan(tenant, &usage, &inventory, day) {
        Ok(plan) => (StatusCode::OK, axum::Json(PlanResponse { plan })).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn catalog_handler(
    State(state): State<PlannerState>,
    Path(tenant): Path<String>,
) -> Response {
    let Some(tenant) = TenantId::from_slug(&tenant) else {
        return unknown_tenant_response(&tenant);
    };
    let Some(profile) = state.planner.directory().get(tenant) else {
        return unknown_tenant_response(tenant.as_str());
    };

    let payload = CatalogResponse {
        tenant,
        weekday_target_minutes: profile.target.weekday_minutes,
        weekend_target_minutes: profile.target.weekend_minutes,
        coupons: profile.catalog.definitions().to_vec(),
    };
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn unknown_tenant_response(tenant: &str) -> Response {
    let payload = json!({ "error": format!("unknown tenant '{tenant}'") });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn resolve_day(request: &PlanRequest, calendar: &DayCalendar) -> DayKind {
    if let Some(is_weekday) = request.is_weekday {
        return if is_weekday {
            DayKind::Weekday
        } else {
            DayKind::Weekend
        };
    }
    let date = request.date.unwrap_or_else(|| Local::now().date_naive());
    calendar.day_kind(date)
}

fn snapshots_from_request(
    request: &PlanRequest,
    profile: &TenantProfile,
) -> (UsageSnapshot, InventorySnapshot) {
    let adapter = profile.adapter();
    let mut usage = UsageSnapshot::default();
    let mut inventory = InventorySnapshot::default();

    for (label, count) in &request.outlet_history {
        match adapter.resolve(label) {
            Some(key) => usage.record_scoped(key, *count),
            None => debug!(%label, "skipping unrecognized outlet history label"),
        }
    }
    for (label, count) in &request.all_history {
        match adapter.resolve(label) {
            Some(key) => usage.record_global(key, *count),
            None => debug!(%label, "skipping unrecognized all-outlets history label"),
        }
    }
    for (label, count) in &request.inventory {
        match adapter.resolve(label) {
            Some(key) => inventory.record(key, *count),
            None => debug!(%label, "skipping unrecognized inventory label"),
        }
    }

    (usage, inventory)
}
