use crate::cli::ServeArgs;
use crate::infra::{load_grid, AppState};
use crate::routes::with_payout_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use payout_engine::config::AppConfig;
use payout_engine::error::AppError;
use payout_engine::telemetry;
use payout_engine::workflows::payout::PayoutProcessor;
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

    let grid = Arc::new(load_grid(&config.grid)?);
    let processor = Arc::new(PayoutProcessor::new(grid));

    let app = with_payout_routes(processor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "payout grid service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
