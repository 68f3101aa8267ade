use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use payout_engine::config::GridConfig;
use payout_engine::error::AppError;
use payout_engine::workflows::payout::PayoutGrid;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolves the process-wide grid: a JSON definition named by config, or
/// the built-in standard grid. Load failures are fatal; there is no
/// partially-loaded table.
pub(crate) fn load_grid(config: &GridConfig) -> Result<PayoutGrid, AppError> {
    match &config.path {
        Some(path) => {
            let grid = PayoutGrid::from_path(path)?;
            info!(path = %path.display(), rows = grid.rules().len(), "loaded payout grid");
            Ok(grid)
        }
        None => Ok(PayoutGrid::standard()),
    }
}
