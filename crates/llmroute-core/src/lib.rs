//! Core domain types and error definitions for llmroute.
//!
//! This crate provides the types shared across the relay:
//!
//! - [`RouteRequest`] and [`RouteResponse`] — the `/llm_route` wire shapes
//! - [`RouteError`] — every way a routed request can fail
//!
//! # Example
//!
//! ```rust
//! use llmroute_core::{RouteRequest, RouteResponse};
//!
//! let req = RouteRequest {
//!     prompt: "Hi".to_string(),
//!     backend: "mistral".to_string(),
//! };
//!
//! let resp = RouteResponse {
//!     reply: "Hi there".to_string(),
//!     backend_used: req.backend.clone(),
//! };
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while routing a prompt to a backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The requested logical backend is not registered.
    #[error("Unknown backend '{backend}'. Valid options: {valid:?}")]
    InvalidBackend { backend: String, valid: Vec<String> },

    /// Ollama could not be reached (refused, timed out, DNS, broken body).
    #[error("Error contacting Ollama: {0}")]
    TransportFailure(String),

    /// Ollama answered with a status other than 200.
    #[error("Ollama returned {status}: {body}")]
    UpstreamError { status: u16, body: String },

    /// Ollama answered 200 but the reply had no usable text.
    #[error("Empty response from Ollama")]
    EmptyUpstreamReply,
}

/// Request body for `POST /llm_route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub prompt: String,
    pub backend: String,
}

/// Response body for a successful `POST /llm_route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub reply: String,
    /// The logical backend name the caller asked for, not the resolved model id.
    pub backend_used: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_backend_lists_valid_options() {
        let err = RouteError::InvalidBackend {
            backend: "gpt".into(),
            valid: vec!["mistral".into(), "llama".into()],
        };
        assert_eq!(
            err.to_string(),
            r#"Unknown backend 'gpt'. Valid options: ["mistral", "llama"]"#
        );
    }

    #[test]
    fn upstream_error_carries_status_and_body() {
        let err = RouteError::UpstreamError {
            status: 404,
            body: r#"{"error":"model 'llama3.1' not found"}"#.into(),
        };
        assert_eq!(
            err.to_string(),
            r#"Ollama returned 404: {"error":"model 'llama3.1' not found"}"#
        );
    }

    #[test]
    fn request_requires_both_fields() {
        let ok: Result<RouteRequest, _> =
            serde_json::from_str(r#"{"prompt":"Hi","backend":"llama"}"#);
        assert!(ok.is_ok());

        let missing: Result<RouteRequest, _> = serde_json::from_str(r#"{"prompt":"Hi"}"#);
        assert!(missing.is_err());
    }
}
