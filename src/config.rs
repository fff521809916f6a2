//! Environment-driven configuration for the collaborator backends.

use std::env;

/// Default Google Translate endpoint (keyless `gtx` client).
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Default Ollama base URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:4b";

/// Backend configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Translation endpoint. Overridable mainly for tests and
    /// self-hosted mirrors.
    pub translate_url: String,
    /// Base URL of the Ollama server answering questions.
    pub ollama_url: String,
    /// Model name passed to Ollama.
    pub ollama_model: String,
}

impl Config {
    /// Build a configuration from environment variables, falling back to
    /// the defaults above for anything unset.
    pub fn from_env() -> Self {
        Self {
            translate_url: env::var("TRANSLATE_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATE_URL.to_string()),
            ollama_url: env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            ollama_model: env::var("OLLAMA_MODEL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}
