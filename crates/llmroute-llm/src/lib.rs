//! Ollama client for the llmroute relay.
//!
//! - [`OllamaClient`] — Single non-streaming call to Ollama's native `/api/chat`
//! - [`OllamaReply`] — Trimmed reply text plus the timing metrics Ollama reports
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use llmroute_llm::OllamaClient;
//!
//! let client = OllamaClient::new("http://localhost:11434/api/chat", Duration::from_secs(120))?;
//! let reply = client.chat("llama3.1", "Hello!").await?;
//! println!("{}", reply.content);
//! ```

mod ollama;

pub use llmroute_core::RouteError;
pub use ollama::{OllamaClient, OllamaMetrics, OllamaReply};
