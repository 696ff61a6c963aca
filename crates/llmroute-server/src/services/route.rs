//! Prompt routing service.
//!
//! Resolves the logical backend, forwards the prompt to Ollama once and
//! echoes the logical name back with the reply.

use llmroute_core::{RouteError, RouteRequest, RouteResponse};
use tracing::info;

use crate::ServerState;

/// Routes a prompt to the model registered under `req.backend`.
pub async fn route(state: &ServerState, req: &RouteRequest) -> Result<RouteResponse, RouteError> {
    let model = state.registry.resolve(&req.backend)?;

    info!(
        "Route request (backend: {}, model: {}): {}...",
        req.backend,
        model,
        preview(&req.prompt, 50)
    );

    let reply = state.ollama.chat(model, &req.prompt).await?;

    Ok(RouteResponse {
        reply: reply.content,
        backend_used: req.backend.clone(),
    })
}

/// Returns at most `max` characters of `text`, respecting char boundaries.
fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
