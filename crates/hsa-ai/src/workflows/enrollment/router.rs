use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::audit::AuditStore;
use super::domain::{ApplicationData, ApplicationId, DecisionConfig};
use super::service::{EnrollmentService, EnrollmentServiceError};

/// Router builder exposing HTTP endpoints for decision evaluation, the audit
/// trail, and the live decision configuration.
pub fn enrollment_router<S>(service: Arc<EnrollmentService<S>>) -> Router
where
    S: AuditStore + 'static,
{
    Router::new()
        .route("/api/v1/enrollment/decisions", post(decide_handler::<S>))
        .route(
            "/api/v1/enrollment/applications/:application_id/audit",
            get(audit_handler::<S>),
        )
        .route(
            "/api/v1/enrollment/config",
            get(config_handler::<S>).put(update_config_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn decide_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    axum::Json(application): axum::Json<ApplicationData>,
) -> Response
where
    S: AuditStore + 'static,
{
    match service.decide(application) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(EnrollmentServiceError::Engine(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn audit_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: AuditStore + 'static,
{
    let id = ApplicationId(application_id);
    match service.audit_trail(&id) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn config_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
) -> Response
where
    S: AuditStore + 'static,
{
    (StatusCode::OK, axum::Json(service.config())).into_response()
}

pub(crate) async fn update_config_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    axum::Json(config): axum::Json<DecisionConfig>,
) -> Response
where
    S: AuditStore + 'static,
{
    match service.update_config(config) {
        Ok(()) => (StatusCode::OK, axum::Json(service.config())).into_response(),
        Err(EnrollmentServiceError::Config(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
