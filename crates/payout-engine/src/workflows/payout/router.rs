use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::domain::{BatchSummary, CalculatedRecord, RawPolicyRecord};
use super::export;
use super::service::PayoutProcessor;

/// Router builder exposing the batch processing and grid inspection
/// endpoints. Mounted by the service binary next to its health routes.
pub fn payout_router(processor: Arc<PayoutProcessor>) -> Router {
    Router::new()
        .route("/api/v1/payouts/process", post(process_handler))
        .route("/api/v1/payouts/grid", get(grid_handler))
        .with_state(processor)
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub company_name: String,
    pub records: Vec<RawPolicyRecord>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub company_name: String,
    pub records: Vec<CalculatedRecord>,
    pub summary: BatchSummary,
    pub csv: String,
}

/// Serialized view of one grid row for the inspection endpoint.
#[derive(Debug, Serialize)]
pub struct GridRowView {
    pub lob: &'static str,
    pub segment: &'static str,
    pub insurers: String,
    pub payout: String,
    pub remarks: String,
}

pub(crate) async fn process_handler(
    State(processor): State<Arc<PayoutProcessor>>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, AppError> {
    let outcome = processor.process_batch(&request.company_name, &request.records)?;
    let csv = export::render_csv(&outcome.records)?;

    Ok(Json(ProcessResponse {
        company_name: request.company_name,
        records: outcome.records,
        summary: outcome.summary,
        csv,
    }))
}

pub(crate) async fn grid_handler(
    State(processor): State<Arc<PayoutProcessor>>,
) -> Json<Vec<GridRowView>> {
    let rows = processor
        .grid()
        .rules()
        .iter()
        .map(|rule| GridRowView {
            lob: rule.lob.label(),
            segment: rule.segment,
            insurers: rule.scope.label(),
            payout: rule.payout_spec.clone(),
            remarks: rule.remarks.label().to_string(),
        })
        .collect();
    Json(rows)
}
