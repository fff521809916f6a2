//! Keyless Google Translate client (`client=gtx` endpoint).

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// The endpoint rejects requests above roughly this many characters, so
/// longer texts are split at sentence boundaries and re-joined.
const MAX_CHUNK_CHARS: usize = 4000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translate request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("translate endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("translate response had no segments")]
    EmptyResponse,
}

/// HTTP client for the free `translate_a/single` endpoint.
pub struct GoogleTranslateClient {
    http: reqwest::Client,
    url: String,
}

impl GoogleTranslateClient {
    pub fn new(url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("reqwest client construction only fails on TLS misconfiguration");
        Self {
            http,
            url: url.to_string(),
        }
    }

    /// Translate `text`, chunking when it exceeds the endpoint limit.
    /// Chunks that fail to translate are kept verbatim so a partial
    /// backend outage degrades instead of discarding the message.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        if text.len() <= MAX_CHUNK_CHARS {
            return self.translate_chunk(text, source_lang, target_lang).await;
        }

        let mut translated = Vec::new();
        for chunk in split_into_chunks(text, MAX_CHUNK_CHARS) {
            match self.translate_chunk(&chunk, source_lang, target_lang).await {
                Ok(result) => translated.push(result),
                Err(e) => {
                    tracing::error!("chunk translation failed, keeping original: {}", e);
                    translated.push(chunk);
                }
            }
        }
        Ok(translated.join(" "))
    }

    async fn translate_chunk(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status));
        }

        let body: Value = response.json().await?;
        parse_segments(&body).ok_or(TranslateError::EmptyResponse)
    }
}

/// The endpoint answers `[[["translated","original",...],...],...]`;
/// concatenate the first element of every segment.
fn parse_segments(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let mut parts = Vec::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            parts.push(part);
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

/// Split text at sentence boundaries (". ") into chunks no longer than
/// `max_chars`. A single oversized sentence becomes its own chunk rather
/// than being split mid-sentence.
fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in text.split(". ") {
        if current.len() + sentence.len() + 2 > max_chars {
            if !current.is_empty() {
                chunks.push(current.trim().to_string());
            }
            current = format!("{}. ", sentence);
        } else {
            current.push_str(sentence);
            current.push_str(". ");
        }
    }
    if !current.is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}
