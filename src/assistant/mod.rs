//! Answer service for question-type messages.
//!
//! Mirrors the shape of the translation service: the router depends on
//! the [`AnswerService`] trait whose method never fails, and the concrete
//! [`AssistantService`] absorbs backend failures into a localized apology.

mod ollama;

use async_trait::async_trait;

pub use ollama::OllamaClient;

/// Minimum useful answer length; anything shorter is treated as a
/// backend failure (empty completions, bare punctuation).
const MIN_ANSWER_CHARS: usize = 15;

/// Produces a natural-language answer to a question in the requested
/// language. Implementations never fail; they fall back to an apology.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn answer(&self, question: &str, lang: &str) -> String;
}

/// Production answer service backed by a local Ollama model.
pub struct AssistantService {
    ollama: OllamaClient,
}

impl AssistantService {
    pub fn new(ollama: OllamaClient) -> Self {
        Self { ollama }
    }
}

#[async_trait]
impl AnswerService for AssistantService {
    async fn answer(&self, question: &str, lang: &str) -> String {
        match self.ollama.generate(question, lang).await {
            Ok(response) => {
                let cleaned = strip_prompt_echo(&response);
                if cleaned.len() > MIN_ANSWER_CHARS {
                    tracing::info!("answered '{}' via ollama", question);
                    cleaned.to_string()
                } else {
                    tracing::warn!("ollama returned an empty/short answer for '{}'", question);
                    apology(question, lang)
                }
            }
            Err(e) => {
                tracing::error!("ollama request failed: {}", e);
                apology(question, lang)
            }
        }
    }
}

/// Models sometimes echo the prompt scaffolding back; keep only what
/// follows the last "Answer:" marker.
fn strip_prompt_echo(response: &str) -> &str {
    match response.rsplit_once("Answer:") {
        Some((_, tail)) => tail.trim(),
        None => response.trim(),
    }
}

/// Localized fixed apology used when no backend produced an answer.
fn apology(question: &str, lang: &str) -> String {
    if lang == "hi" {
        format!(
            "मुझे '{}' के बारे में बताने में खुशी होगी, लेकिन अभी AI model से connection में समस्या है। कृपया बाद में फिर से प्रयास करें।",
            question
        )
    } else {
        format!(
            "I'd love to help answer your question about '{}', but I'm having trouble reaching the AI model right now. Please try again later.",
            question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_strip_prompt_echo_removes_scaffolding() {
        let response = "Question: what is rust?\n\nAnswer: A systems programming language.";
        assert_eq!(
            strip_prompt_echo(response),
            "A systems programming language."
        );
    }

    #[test]
    fn test_strip_prompt_echo_keeps_clean_answers() {
        assert_eq!(strip_prompt_echo("  Paris is the capital.  "), "Paris is the capital.");
    }

    #[test]
    fn test_apology_is_localized() {
        let en = apology("what is rust?", "en");
        let hi = apology("what is rust?", "hi");
        assert!(en.contains("what is rust?"));
        assert!(hi.contains("what is rust?"));
        assert_ne!(en, hi);
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_apology() {
        let config = Config {
            ollama_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let service = AssistantService::new(OllamaClient::new(
            &config.ollama_url,
            &config.ollama_model,
        ));

        let answer = service.answer("what is rust?", "en").await;

        assert!(answer.contains("what is rust?"));
        assert!(answer.contains("trouble reaching"));
    }
}
