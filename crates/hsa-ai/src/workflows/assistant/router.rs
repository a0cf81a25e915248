use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{QaRequest, VectorSearchRequest};
use super::providers::{AnswerGenerator, EmbeddingProvider};
use super::service::{AssistantError, HsaAssistantService};

/// Router builder exposing HTTP endpoints for Q&A, raw vector search, and
/// knowledge-base statistics.
pub fn assistant_router<E, G>(service: Arc<HsaAssistantService<E, G>>) -> Router
where
    E: EmbeddingProvider + 'static,
    G: AnswerGenerator + 'static,
{
    Router::new()
        .route("/api/v1/assistant/ask", post(ask_handler::<E, G>))
        .route("/api/v1/assistant/search", post(search_handler::<E, G>))
        .route("/api/v1/assistant/stats", get(stats_handler::<E, G>))
        .route("/api/v1/assistant/metrics", get(metrics_handler::<E, G>))
        .with_state(service)
}

fn error_response(error: AssistantError) -> Response {
    let status = match error {
        AssistantError::Embedding(_) | AssistantError::Generation(_) => StatusCode::BAD_GATEWAY,
        AssistantError::KnowledgeBase(_) | AssistantError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn ask_handler<E, G>(
    State(service): State<Arc<HsaAssistantService<E, G>>>,
    axum::Json(request): axum::Json<QaRequest>,
) -> Response
where
    E: EmbeddingProvider + 'static,
    G: AnswerGenerator + 'static,
{
    match service.answer(&request).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn search_handler<E, G>(
    State(service): State<Arc<HsaAssistantService<E, G>>>,
    axum::Json(request): axum::Json<VectorSearchRequest>,
) -> Response
where
    E: EmbeddingProvider + 'static,
    G: AnswerGenerator + 'static,
{
    match service.vector_search(&request).await {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<E, G>(
    State(service): State<Arc<HsaAssistantService<E, G>>>,
) -> Response
where
    E: EmbeddingProvider + 'static,
    G: AnswerGenerator + 'static,
{
    (StatusCode::OK, axum::Json(service.knowledge_base_stats())).into_response()
}

pub(crate) async fn metrics_handler<E, G>(
    State(service): State<Arc<HsaAssistantService<E, G>>>,
) -> Response
where
    E: EmbeddingProvider + 'static,
    G: AnswerGenerator + 'static,
{
    (StatusCode::OK, axum::Json(service.metrics())).into_response()
}
