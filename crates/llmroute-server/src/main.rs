//! HTTP server entry point and Axum router setup.
//!
//! Reads settings from the environment, builds the shared state (backend
//! registry and Ollama client), and serves the relay routes.

mod error;
mod handlers;
mod services;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use llmroute_config::{BackendRegistry, Settings};
use llmroute_llm::OllamaClient;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared server state accessible from all handlers. Read-only after startup.
pub struct ServerState {
    pub registry: BackendRegistry,
    pub ollama: OllamaClient,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let registry = BackendRegistry::default();
    let ollama = OllamaClient::new(&settings.ollama_url, settings.timeout)
        .context("failed to build Ollama HTTP client")?;

    info!(
        "Forwarding to {} (timeout {}s)",
        ollama.chat_url(),
        settings.timeout.as_secs()
    );
    for backend in registry.list() {
        info!("  - {} -> {}", backend.name, backend.model);
    }

    let state = Arc::new(ServerState { registry, ollama });
    let app = build_router(state);

    info!("Starting server on {}", settings.addr);

    let listener = tokio::net::TcpListener::bind(&settings.addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router over the given state.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/llm_route", post(handlers::route::llm_route))
        .route("/privacy", get(handlers::privacy::privacy))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
