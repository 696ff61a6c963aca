//! Native Ollama API client.
//!
//! Talks to Ollama's /api/chat endpoint (not the OpenAI-compatible /v1 one) so the
//! `keep_alive` flag and load/eval timings are available.

use std::error::Error as StdError;
use std::time::Duration;

use llmroute_core::RouteError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Performance metrics from Ollama's native API. Durations are nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaMetrics {
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub load_duration: u64,
    #[serde(default)]
    pub prompt_eval_count: u32,
    #[serde(default)]
    pub prompt_eval_duration: u64,
    #[serde(default)]
    pub eval_count: u32,
    #[serde(default)]
    pub eval_duration: u64,
}

impl OllamaMetrics {
    /// Calculates tokens generated per second.
    pub fn tokens_per_sec(&self) -> f64 {
        if self.eval_duration == 0 {
            return 0.0;
        }
        (self.eval_count as f64) / (self.eval_duration as f64 / 1_000_000_000.0)
    }

    /// Total request duration in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration / 1_000_000
    }

    /// Model load time in milliseconds.
    pub fn load_duration_ms(&self) -> u64 {
        self.load_duration / 1_000_000
    }
}

/// A usable reply from Ollama.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaReply {
    /// Reply text with surrounding whitespace removed. Never empty.
    pub content: String,
    pub metrics: OllamaMetrics,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: [OllamaMessage<'a>; 1],
    stream: bool,
    keep_alive: u32,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Client for a single Ollama chat endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    chat_url: String,
}

impl OllamaClient {
    /// Creates a client for the given chat URL with a per-request timeout.
    pub fn new(chat_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            chat_url: chat_url.to_string(),
        })
    }

    /// The chat endpoint this client posts to.
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Sends one non-streaming chat turn and returns the trimmed reply.
    ///
    /// The model is asked to unload right after answering (`keep_alive: 0`).
    pub async fn chat(&self, model: &str, prompt: &str) -> Result<OllamaReply, RouteError> {
        let request = OllamaChatRequest {
            model,
            messages: [OllamaMessage { role: "user", content: prompt }],
            stream: false,
            keep_alive: 0,
        };

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(transport_err)?;
        let (content, metrics) = parse_chat_body(&body);
        if content.is_empty() {
            debug!("Ollama returned no content: {}", body);
            return Err(RouteError::EmptyUpstreamReply);
        }

        info!(
            "Ollama ({}): {}ms total, {}ms load, {:.1} tok/s, {} eval tokens",
            model,
            metrics.total_duration_ms(),
            metrics.load_duration_ms(),
            metrics.tokens_per_sec(),
            metrics.eval_count
        );

        Ok(OllamaReply { content, metrics })
    }
}

/// Pulls `message.content` (trimmed) and metrics out of a chat response body.
///
/// Anything that is not the expected shape yields empty content.
fn parse_chat_body(body: &str) -> (String, OllamaMetrics) {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return (String::new(), OllamaMetrics::default());
    };

    let content = value
        .pointer("/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    let metrics = serde_json::from_value(value).unwrap_or_default();

    (content, metrics)
}

/// Formats a reqwest error with its source chain so timeouts and refusals are visible.
fn transport_err(e: reqwest::Error) -> RouteError {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    RouteError::TransportFailure(message)
}
