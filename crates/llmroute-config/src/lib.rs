//! Backend registry and runtime settings.
//!
//! - [`BackendRegistry`] — Fixed mapping from logical backend names to Ollama model ids
//! - [`Settings`] — Ollama endpoint, timeout and bind address, read from the environment
//!
//! # Resolving a backend
//!
//! ```rust
//! use llmroute_config::BackendRegistry;
//!
//! let registry = BackendRegistry::default();
//! assert_eq!(registry.resolve("llama").unwrap(), "llama3.1");
//! assert!(registry.resolve("gpt").is_err());
//! ```

use std::time::Duration;

use llmroute_core::RouteError;

/// Default Ollama native chat endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/chat";

/// Default outbound request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default server bind address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Errors that can occur when reading settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value that could not be used.
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// A single logical backend and the model it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub name: String,
    pub model: String,
}

/// Immutable mapping from logical backend name to model identifier.
///
/// Declaration order is kept so error messages list options deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRegistry {
    backends: Vec<Backend>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::from_pairs([("mistral", "mistral"), ("llama", "llama3.1")])
    }
}

impl BackendRegistry {
    /// Builds a registry from `(name, model)` pairs. Later duplicates are ignored.
    pub fn from_pairs<I, N, M>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, M)>,
        N: Into<String>,
        M: Into<String>,
    {
        let mut backends: Vec<Backend> = Vec::new();
        for (name, model) in pairs {
            let name = name.into();
            if backends.iter().any(|b| b.name == name) {
                continue;
            }
            backends.push(Backend { name, model: model.into() });
        }
        Self { backends }
    }

    /// Looks up the model id for a logical backend name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.backends
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.model.as_str())
    }

    /// Resolves a logical name, failing with the list of valid names.
    pub fn resolve(&self, name: &str) -> Result<&str, RouteError> {
        self.get(name).ok_or_else(|| RouteError::InvalidBackend {
            backend: name.to_string(),
            valid: self.names().map(str::to_string).collect(),
        })
    }

    /// Returns the logical names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.iter().map(|b| b.name.as_str())
    }

    /// Returns all registered backends.
    pub fn list(&self) -> &[Backend] {
        &self.backends
    }
}

/// Runtime settings for the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ollama_url: String,
    pub timeout: Duration,
    pub addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through a lookup function, falling back to defaults.
    ///
    /// Recognised keys: `OLLAMA_URL`, `OLLAMA_TIMEOUT_SECS`, `LLMROUTE_ADDR`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup("OLLAMA_URL").filter(|v| !v.trim().is_empty()) {
            settings.ollama_url = url.trim().to_string();
        }

        if let Some(raw) = lookup("OLLAMA_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid { key: "OLLAMA_TIMEOUT_SECS", value: raw.clone() })?;
            settings.timeout = Duration::from_secs(secs);
        }

        if let Some(addr) = lookup("LLMROUTE_ADDR").filter(|v| !v.trim().is_empty()) {
            settings.addr = addr.trim().to_string();
        }

        Ok(settings)
    }
}
