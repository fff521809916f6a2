//! Ollama API client for the `/api/generate` endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("ollama request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("ollama returned status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: i32,
    repeat_penalty: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Ollama API client
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client construction only fails on TLS misconfiguration");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Ask the configured model to answer `question` in `lang`.
    pub async fn generate(&self, question: &str, lang: &str) -> Result<String, AnswerError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: build_prompt(question, lang),
            stream: false,
            options: GenerateOptions {
                temperature: 0.7,
                top_p: 0.9,
                num_predict: 300,
                repeat_penalty: 1.1,
            },
        };

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnswerError::Status(status));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}

fn build_prompt(question: &str, lang: &str) -> String {
    if lang == "hi" {
        format!(
            "You are a helpful AI assistant. Please respond in Hindi language only.\n\n\
             Question: {}\n\n\
             Please provide a clear, informative answer in Hindi:",
            question
        )
    } else {
        format!(
            "You are a helpful AI assistant. Please provide a clear, informative answer.\n\n\
             Question: {}\n\n\
             Answer:",
            question
        )
    }
}
