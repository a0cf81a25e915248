use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use hsa_ai::workflows::assistant::{
    assistant_router, AnswerGenerator, EmbeddingProvider, HsaAssistantService,
};
use hsa_ai::workflows::enrollment::{enrollment_router, AuditStore, EnrollmentService};

use crate::infra::AppState;

pub(crate) fn with_workflow_routes<S, E, G>(
    enrollment: Arc<EnrollmentService<S>>,
    assistant: Arc<HsaAssistantService<E, G>>,
) -> axum::Router
where
    S: AuditStore + 'static,
    E: EmbeddingProvider + 'static,
    G: AnswerGenerator + 'static,
{
    enrollment_router(enrollment)
        .merge(assistant_router(assistant))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
