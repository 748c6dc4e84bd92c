use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_redemption_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use parking_ai::config::AppConfig;
use parking_ai::error::AppError;
use parking_ai::telemetry;
use parking_ai::tenants::TenantDirectory;
use parking_ai::workflows::redemption::{DayCalendar, PlannerState, RedemptionPlanner};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let planner_state = PlannerState {
        planner: Arc::new(RedemptionPlanner::new(Arc::new(TenantDirectory::standard()))),
        calendar: Arc::new(DayCalendar::new(config.planner.holidays.iter().copied())),
    };

    let app = with_redemption_routes(planner_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "coupon allocation planner ready");

    axum::serve(listener, app).await?;
    Ok(())
}
