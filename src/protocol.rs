//! Wire envelopes for the WebSocket protocol.
//!
//! Inbound frames come from clients as JSON text, discriminated by the
//! `type` field. Outbound frames go to one specific client each; the
//! router builds a distinct outbound event per recipient so that the
//! `to_lang` / `translated_text` fields can differ between recipients.

use serde::{Deserialize, Serialize};

/// Display name used when a client never sent a `join` event.
pub const DEFAULT_NAME: &str = "Anon";

/// Language used when a client never declared a preference.
pub const DEFAULT_LANG: &str = "en";

/// Sender label attached to AI answers.
pub const ASSISTANT_LABEL: &str = "🤖 AI Assistant";

/// A decoded message from one client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Client announces its display name and language preference.
    Join {
        #[serde(default = "default_name")]
        name: String,
        #[serde(default = "default_lang")]
        lang: String,
    },
    /// Free-text chat message. `lang` overrides the sender's stored
    /// language preference for this one message.
    Message {
        #[serde(default)]
        text: String,
        lang: Option<String>,
    },
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

/// An event addressed to one specific client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Human-readable notice, e.g. "Ann joined (en)".
    System { msg: String },
    /// A relayed chat message, translated for the recipient.
    Chat {
        from: String,
        from_lang: String,
        text: String,
        translated_text: String,
        to_lang: String,
    },
    /// An AI answer to a question, translated for the recipient.
    AiChat {
        from: String,
        from_lang: String,
        text: String,
        translated_text: String,
        to_lang: String,
        original_question: String,
    },
}

impl OutboundEvent {
    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("outbound event is always serializable")
    }
}
