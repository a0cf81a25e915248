use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::{error, info, warn};

use hsa_ai::config::AppConfig;
use hsa_ai::error::AppError;
use hsa_ai::telemetry;
use hsa_ai::workflows::assistant::{HsaAssistantService, OpenAiProvider};
use hsa_ai::workflows::enrollment::{EnrollmentService, InMemoryAuditStore};

use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_workflow_routes;

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

    let audit_store = Arc::new(InMemoryAuditStore::default());
    let enrollment_service = Arc::new(EnrollmentService::new(
        audit_store,
        config.decision.clone(),
    ));

    let api_key = match config.assistant.openai_api_key.as_deref() {
        Some(key) => key.to_string(),
        None => {
            warn!("OPENAI_API_KEY is not set; assistant requests will fail at the provider");
            String::new()
        }
    };
    let provider = Arc::new(OpenAiProvider::with_base_url(
        api_key,
        config.assistant.openai_base_url.clone(),
    ));
    let assistant_service = Arc::new(HsaAssistantService::new(provider.clone(), provider));

    // Knowledge-base indexing is best effort at startup; the service still
    // serves enrollment traffic when it fails.
    match assistant_service
        .build_knowledge_base(&config.assistant.knowledge_base_dir)
        .await
    {
        Ok(stats) => info!(
            documents = stats.total_documents,
            chunks = stats.total_chunks,
            "knowledge base indexed"
        ),
        Err(err) => error!(%err, "knowledge base indexing failed"),
    }

    let app = with_workflow_routes(enrollment_service, assistant_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hsa enrollment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
