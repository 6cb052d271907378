//! HTTP API over the risk service

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::alerts::Alert;
use crate::error::GuardError;
use crate::ledger::{Block, ChainVerification};
use crate::service::RiskService;
use crate::vendors::Vendor;

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = match &self {
            GuardError::VendorNotFound(_) => StatusCode::NOT_FOUND,
            GuardError::AssessmentError(_) | GuardError::InvalidAssessment(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(service: RiskService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/vendors", get(list_vendors))
        .route("/vendors/:id/assessments", post(assess_vendor))
        .route("/ledger", get(ledger_snapshot))
        .route("/ledger/verify", get(verify_chain))
        .route("/ledger/merkle-root", get(merkle_root))
        .route("/ledger/export", get(export_ledger))
        .route("/alerts", get(list_alerts))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(service)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "biorisk-guard",
        "timestamp": chrono::Utc::now()
    }))
}

async fn list_vendors(State(service): State<RiskService>) -> Json<Vec<Vendor>> {
    Json(service.vendors().await)
}

async fn assess_vendor(
    State(service): State<RiskService>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Block>), GuardError> {
    let block = service.assess_vendor(&id).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

async fn ledger_snapshot(State(service): State<RiskService>) -> Json<Vec<Block>> {
    Json(service.ledger_snapshot().await)
}

async fn verify_chain(State(service): State<RiskService>) -> Json<ChainVerification> {
    Json(service.verify_chain().await)
}

async fn merkle_root(
    State(service): State<RiskService>,
) -> Result<Json<serde_json::Value>, GuardError> {
    let root = service.merkle_root().await?;
    Ok(Json(json!({ "merkleRoot": root })))
}

async fn export_ledger(State(service): State<RiskService>) -> Result<Response, GuardError> {
    let body = service.export_jsonl().await?;
    Ok(([(header::CONTENT_TYPE, "application/x-ndjson")], body).into_response())
}

async fn list_alerts(State(service): State<RiskService>) -> Json<Vec<Alert>> {
    Json(service.alerts())
}
