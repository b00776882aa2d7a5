//! Google Document AI OCR node - HTTP-hosted workflow integration.

mod auth;
mod config;
mod content;
mod credentials;
mod descriptor;
mod documentai;
mod error;
mod executor;
mod flatten;
mod host;
mod node;
mod params;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use config::ServiceConfig;
use documentai::client::DocumentAiFactory;
use documentai::ProcessorFactory;
use host::{ExecuteRequest, ExecuteResponse};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    processors: Arc<dyn ProcessorFactory>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "docai_ocr_node=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    match &config.document_ai_endpoint {
        Some(endpoint) => info!("Document AI endpoint override: {}", endpoint),
        None => info!("Document AI endpoint: regional default"),
    }

    let state = AppState {
        processors: Arc::new(DocumentAiFactory::new(config.document_ai_endpoint.clone())),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/node", get(describe_node))
        .route("/credentials", get(describe_credentials))
        .route("/execute", post(execute))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Node descriptor for the host's configuration UI.
async fn describe_node() -> Json<node::NodeDescription> {
    Json(node::google_document_ai())
}

/// Credential descriptor for the host's credential store.
async fn describe_credentials() -> Json<credentials::CredentialDescriptor> {
    Json(credentials::google_service_account_api())
}

/// Run the node over one batch of input items.
async fn execute(
    State(state): State<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, (StatusCode, Json<serde_json::Value>)> {
    let execution_id = Uuid::new_v4().simple().to_string();
    let span = info_span!("execute", execution_id = %execution_id, items = request.items.len());

    let result = executor::execute(&request, state.processors.as_ref())
        .instrument(span.clone())
        .await;

    match result {
        Ok(items) => {
            span.in_scope(|| info!("Execution complete: {} output items", items.len()));
            Ok(Json(ExecuteResponse { items }))
        }
        Err(e) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": e.source.to_string(),
                "itemIndex": e.item_index,
            })),
        )),
    }
}
