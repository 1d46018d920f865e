use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use lead_ai::leads::{lead_router, LeadRepository, LeadService};
use lead_ai::scoring::{LeadScoringService, SampleLead};

pub(crate) fn with_lead_routes<R>(
    service: Arc<LeadService<R>>,
    scorer: Arc<LeadScoringService>,
) -> axum::Router
where
    R: LeadRepository + 'static,
{
    lead_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/mock-data", axum::routing::get(mock_data_endpoint))
        .layer(Extension(scorer))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// The reference sample leads backing the scorer, exposed for the demo UI.
pub(crate) async fn mock_data_endpoint(
    Extension(scorer): Extension<Arc<LeadScoringService>>,
) -> Json<Vec<SampleLead>> {
    Json(scorer.reference().to_vec())
}
