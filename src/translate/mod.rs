//! Language resolution service.
//!
//! The router only ever sees the [`Translator`] trait, whose single
//! method never fails: every retry and fallback lives behind it. The
//! concrete [`TranslationService`] chains strategies — the keyless Google
//! Translate endpoint first, then a small phrase dictionary, then an
//! annotated copy of the original text.

mod dictionary;
mod google;

use async_trait::async_trait;

pub use google::GoogleTranslateClient;

/// Translates text between two language codes. Implementations absorb
/// all backend failures and always return a non-empty string.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String;
}

/// Production translator with a fallback chain.
pub struct TranslationService {
    google: GoogleTranslateClient,
}

impl TranslationService {
    pub fn new(google: GoogleTranslateClient) -> Self {
        Self { google }
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        if text.is_empty() || source_lang == target_lang {
            return text.to_string();
        }

        // Strategy 1: Google Translate API
        match self.google.translate(text, source_lang, target_lang).await {
            Ok(result) => {
                let result = result.trim();
                if !result.is_empty() && result != text {
                    tracing::info!(
                        "translated ({} -> {}): '{}' -> '{}'",
                        source_lang,
                        target_lang,
                        text,
                        result
                    );
                    return result.to_string();
                }
            }
            Err(e) => {
                tracing::error!("google translate failed: {}", e);
            }
        }

        // Strategy 2: phrase dictionary for common words
        if let Some(result) = dictionary::lookup(text, source_lang, target_lang) {
            tracing::info!(
                "translated via dictionary ({} -> {}): '{}' -> '{}'",
                source_lang,
                target_lang,
                text,
                result
            );
            return result;
        }

        // Strategy 3: give up, but say so
        tracing::warn!(
            "all translation strategies failed for '{}' ({} -> {})",
            text,
            source_lang,
            target_lang
        );
        format!("{} (translation unavailable)", text)
    }
}
