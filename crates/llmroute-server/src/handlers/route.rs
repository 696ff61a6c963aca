//! Prompt relay handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use llmroute_core::{RouteRequest, RouteResponse};

use crate::error::AppError;
use crate::services;
use crate::ServerState;

/// Forwards a prompt to the requested backend and returns its reply.
pub async fn llm_route(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let response = services::route::route(&state, &req).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use httpmock::prelude::*;
    use llmroute_config::BackendRegistry;
    use llmroute_llm::OllamaClient;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{build_router, ServerState};

    fn app(ollama_url: &str, timeout: Duration) -> Router {
        let state = ServerState {
            registry: BackendRegistry::default(),
            ollama: OllamaClient::new(ollama_url, timeout).unwrap(),
        };
        build_router(Arc::new(state))
    }

    async fn post_route(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/llm_route")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn ollama_replying(status: u16, body: Value) -> MockServer {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat");
                then.status(status)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await;
        server
    }

    #[tokio::test]
    async fn relays_reply_for_known_backend() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/chat").json_body(json!({
                    "model": "mistral",
                    "messages": [{ "role": "user", "content": "Hi" }],
                    "stream": false,
                    "keep_alive": 0
                }));
                then.status(200).json_body(json!({ "message": { "content": "Hi there" } }));
            })
            .await;

        let app = app(&server.url("/api/chat"), Duration::from_secs(5));
        let (status, body) = post_route(app, json!({ "prompt": "Hi", "backend": "mistral" })).await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reply": "Hi there", "backend_used": "mistral" }));
    }

    #[tokio::test]
    async fn unknown_backend_is_400_with_options() {
        let app = app("http://127.0.0.1:1/api/chat", Duration::from_secs(1));
        let (status, body) = post_route(app, json!({ "prompt": "Hi", "backend": "gpt-4" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            r#"Unknown backend 'gpt-4'. Valid options: ["mistral", "llama"]"#
        );
    }

    #[tokio::test]
    async fn unreachable_ollama_is_502() {
        let app = app("http://127.0.0.1:1/api/chat", Duration::from_secs(2));
        let (status, body) = post_route(app, json!({ "prompt": "Hi", "backend": "llama" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Error contacting Ollama: "), "{}", detail);
    }

    #[tokio::test]
    async fn upstream_failure_is_502_with_status_and_body() {
        let server = ollama_replying(500, json!({ "error": "out of memory" })).await;

        let app = app(&server.url("/api/chat"), Duration::from_secs(5));
        let (status, body) = post_route(app, json!({ "prompt": "Hi", "backend": "llama" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["detail"], r#"Ollama returned 500: {"error":"out of memory"}"#);
    }

    #[tokio::test]
    async fn empty_reply_is_500() {
        for reply in [
            json!({ "done": true }),
            json!({ "message": { "content": "" } }),
            json!({ "message": { "content": "   " } }),
        ] {
            let server = ollama_replying(200, reply).await;

            let app = app(&server.url("/api/chat"), Duration::from_secs(5));
            let (status, body) = post_route(app, json!({ "prompt": "Hi", "backend": "mistral" })).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["detail"], "Empty response from Ollama");
        }
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let server = ollama_replying(200, json!({ "message": { "content": "  Hello  " } })).await;

        let app = app(&server.url("/api/chat"), Duration::from_secs(5));
        let (status, body) = post_route(app, json!({ "prompt": "Hi", "backend": "llama" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reply": "Hello", "backend_used": "llama" }));
    }

    #[tokio::test]
    async fn privacy_is_static_html() {
        let app = app("http://127.0.0.1:1/api/chat", Duration::from_secs(1));

        let mut bodies = Vec::new();
        for uri in ["/privacy", "/privacy?lang=de&x=1"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
            assert!(content_type.starts_with("text/html"));
            bodies.push(response.into_body().collect().await.unwrap().to_bytes());
        }

        assert_eq!(bodies[0], bodies[1]);
        assert!(String::from_utf8_lossy(&bodies[0]).contains("<h1>Privacy Policy"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = app("http://127.0.0.1:1/api/chat", Duration::from_secs(1));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }
}
