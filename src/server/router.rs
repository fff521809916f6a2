//! Message router: per-event fan-out and translation orchestration.
//!
//! One inbound event produces one outbound event per recipient. Within
//! an event the per-recipient deliveries run concurrently and are joined
//! before control returns to the connection's read loop, so a
//! connection's stream is processed strictly FIFO while recipients race
//! only against each other. A failing delivery never aborts its
//! siblings.

use std::sync::Arc;

use futures_util::future::join_all;

use crate::assistant::AnswerService;
use crate::classifier::is_question;
use crate::protocol::{ASSISTANT_LABEL, InboundEvent, OutboundEvent};
use crate::translate::Translator;

use super::registry::{ConnectionId, Recipient, SessionRegistry};

/// Answers are always requested from the assistant in this language and
/// re-translated per recipient afterwards.
const PIVOT_LANG: &str = "en";

/// Orchestration core: owns the registry handle and the collaborator
/// services, and turns one inbound event into per-recipient deliveries.
#[derive(Clone)]
pub struct MessageRouter {
    registry: Arc<SessionRegistry>,
    translator: Arc<dyn Translator>,
    assistant: Arc<dyn AnswerService>,
}

impl MessageRouter {
    pub fn new(
        registry: Arc<SessionRegistry>,
        translator: Arc<dyn Translator>,
        assistant: Arc<dyn AnswerService>,
    ) -> Self {
        Self {
            registry,
            translator,
            assistant,
        }
    }

    /// Process one decoded inbound event from `sender_id`. Returns only
    /// after every per-recipient delivery has finished or failed.
    pub async fn handle_event(&self, sender_id: ConnectionId, event: InboundEvent) {
        match event {
            InboundEvent::Join { name, lang } => {
                tracing::info!("'{}' joined as '{}' ({})", sender_id, name, lang);
                self.registry.set_metadata(sender_id, &name, &lang).await;
                self.broadcast_system(&format!("{} joined ({})", name, lang))
                    .await;
            }
            InboundEvent::Message { text, lang } => {
                self.handle_message(sender_id, &text, lang.as_deref()).await;
            }
        }
    }

    async fn handle_message(
        &self,
        sender_id: ConnectionId,
        text: &str,
        lang_override: Option<&str>,
    ) {
        let (sender_name, stored_lang) = self.registry.sender_meta(sender_id).await;
        let sender_lang = lang_override.unwrap_or(&stored_lang);

        if is_question(text) {
            tracing::debug!("question from '{}': '{}'", sender_name, text);
            self.broadcast_answer(text).await;
        } else {
            tracing::debug!("chat from '{}' ({}): '{}'", sender_name, sender_lang, text);
            self.broadcast_chat(&sender_name, sender_lang, text).await;
        }
    }

    /// Chat pipeline: translate the message into every recipient's
    /// language and deliver one `chat` event each, sender included.
    async fn broadcast_chat(&self, from: &str, from_lang: &str, text: &str) {
        let recipients = self.registry.snapshot().await;

        let deliveries = recipients.into_iter().map(|recipient| async move {
            let to_lang = recipient.lang.clone();
            let translated = self.translator.translate(text, from_lang, &to_lang).await;
            let event = OutboundEvent::Chat {
                from: from.to_string(),
                from_lang: from_lang.to_string(),
                text: text.to_string(),
                translated_text: translated,
                to_lang,
            };
            self.send_or_unregister(&recipient, &event).await;
        });

        join_all(deliveries).await;
    }

    /// AI pipeline: ask the assistant in the pivot language, translate
    /// the answer per recipient, deliver one `ai_chat` event each.
    ///
    /// Each recipient triggers its own assistant call; answers are not
    /// shared across recipients, so backend cost scales with the
    /// recipient count.
    async fn broadcast_answer(&self, question: &str) {
        let recipients = self.registry.snapshot().await;

        let deliveries = recipients.into_iter().map(|recipient| async move {
            let answer = self.assistant.answer(question, PIVOT_LANG).await;
            let translated = if recipient.lang != PIVOT_LANG {
                self.translator
                    .translate(&answer, PIVOT_LANG, &recipient.lang)
                    .await
            } else {
                answer
            };
            let event = OutboundEvent::AiChat {
                from: ASSISTANT_LABEL.to_string(),
                from_lang: PIVOT_LANG.to_string(),
                text: format!("Q: {}", question),
                translated_text: format!("A: {}", translated),
                to_lang: recipient.lang.clone(),
                original_question: question.to_string(),
            };
            self.send_or_unregister(&recipient, &event).await;
        });

        join_all(deliveries).await;
    }

    /// Untranslated notice to every active connection.
    async fn broadcast_system(&self, msg: &str) {
        let event = OutboundEvent::System {
            msg: msg.to_string(),
        };
        for recipient in self.registry.snapshot().await {
            self.send_or_unregister(&recipient, &event).await;
        }
    }

    /// Deliver one event to one recipient. A closed channel means the
    /// client is gone: log and drop it from the registry instead of
    /// failing the fan-out.
    async fn send_or_unregister(&self, recipient: &Recipient, event: &OutboundEvent) {
        if recipient.sender.send(event.to_json()).is_err() {
            tracing::warn!("Failed to send to client '{}', unregistering", recipient.id);
            self.registry.unregister(recipient.id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::MockAnswerService;
    use crate::translate::MockTranslator;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    /// Translator stub: same-language passthrough, otherwise a marked
    /// string that records the target language.
    fn marking_translator() -> MockTranslator {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .returning(|text, source, target| {
                if source == target {
                    text.to_string()
                } else {
                    format!("[{}] {}", target, text)
                }
            });
        translator
    }

    fn canned_assistant(times: usize) -> MockAnswerService {
        let mut assistant = MockAnswerService::new();
        assistant
            .expect_answer()
            .times(times)
            .returning(|question, _lang| format!("answer to '{}'", question));
        assistant
    }

    fn router_with(
        translator: MockTranslator,
        assistant: MockAnswerService,
    ) -> (MessageRouter, Arc<SessionRegistry>) {
        let registry = Arc::new(SessionRegistry::new());
        let router = MessageRouter::new(registry.clone(), Arc::new(translator), Arc::new(assistant));
        (router, registry)
    }

    async fn connect(
        registry: &SessionRegistry,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.register(id, tx).await;
        (id, rx)
    }

    fn recv_event(rx: &mut mpsc::UnboundedReceiver<String>) -> OutboundEvent {
        let raw = rx.try_recv().expect("expected an outbound event");
        serde_json::from_str(&raw).expect("outbound frame is valid JSON")
    }

    fn assert_no_more_events(rx: &mut mpsc::UnboundedReceiver<String>) {
        assert!(rx.try_recv().is_err(), "unexpected extra outbound event");
    }

    #[tokio::test]
    async fn test_join_attaches_metadata_and_broadcasts_system_notice() {
        let (router, registry) = router_with(marking_translator(), canned_assistant(0));
        let (a, mut rx_a) = connect(&registry).await;
        let (_b, mut rx_b) = connect(&registry).await;

        router
            .handle_event(
                a,
                InboundEvent::Join {
                    name: "Ann".to_string(),
                    lang: "en".to_string(),
                },
            )
            .await;

        let (name, lang) = registry.sender_meta(a).await;
        assert_eq!(name, "Ann");
        assert_eq!(lang, "en");
        for rx in [&mut rx_a, &mut rx_b] {
            match recv_event(rx) {
                OutboundEvent::System { msg } => assert_eq!(msg, "Ann joined (en)"),
                other => panic!("expected system event, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_chat_fanout_translates_per_recipient() {
        // Scenario: Ann (en) and Bo (hi); Ann says "hello everyone".
        let (router, registry) = router_with(marking_translator(), canned_assistant(0));
        let (a, mut rx_a) = connect(&registry).await;
        let (b, mut rx_b) = connect(&registry).await;
        registry.set_metadata(a, "Ann", "en").await;
        registry.set_metadata(b, "Bo", "hi").await;

        router
            .handle_event(
                a,
                InboundEvent::Message {
                    text: "hello everyone".to_string(),
                    lang: None,
                },
            )
            .await;

        match recv_event(&mut rx_a) {
            OutboundEvent::Chat {
                from,
                from_lang,
                text,
                translated_text,
                to_lang,
            } => {
                assert_eq!(from, "Ann");
                assert_eq!(from_lang, "en");
                assert_eq!(text, "hello everyone");
                assert_eq!(translated_text, "hello everyone");
                assert_eq!(to_lang, "en");
            }
            other => panic!("expected chat event, got {:?}", other),
        }
        match recv_event(&mut rx_b) {
            OutboundEvent::Chat {
                translated_text,
                to_lang,
                ..
            } => {
                assert_eq!(translated_text, "[hi] hello everyone");
                assert_eq!(to_lang, "hi");
            }
            other => panic!("expected chat event, got {:?}", other),
        }
        assert_no_more_events(&mut rx_a);
        assert_no_more_events(&mut rx_b);
    }

    #[tokio::test]
    async fn test_chat_lang_override_replaces_stored_preference() {
        let (router, registry) = router_with(marking_translator(), canned_assistant(0));
        let (a, mut rx_a) = connect(&registry).await;
        registry.set_metadata(a, "Ann", "en").await;

        router
            .handle_event(
                a,
                InboundEvent::Message {
                    text: "bonjour tout le monde".to_string(),
                    lang: Some("fr".to_string()),
                },
            )
            .await;

        match recv_event(&mut rx_a) {
            OutboundEvent::Chat {
                from_lang,
                translated_text,
                ..
            } => {
                assert_eq!(from_lang, "fr");
                // fr -> en goes through the translator
                assert_eq!(translated_text, "[en] bonjour tout le monde");
            }
            other => panic!("expected chat event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_anonymous_sender_gets_default_metadata() {
        let (router, registry) = router_with(marking_translator(), canned_assistant(0));
        let (a, mut rx_a) = connect(&registry).await;
        // No join event for `a`.

        router
            .handle_event(
                a,
                InboundEvent::Message {
                    text: "hello there".to_string(),
                    lang: None,
                },
            )
            .await;

        match recv_event(&mut rx_a) {
            OutboundEvent::Chat {
                from, from_lang, ..
            } => {
                assert_eq!(from, "Anon");
                assert_eq!(from_lang, "en");
            }
            other => panic!("expected chat event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_question_fanout_queries_assistant_per_recipient() {
        // Scenario: a question triggers one assistant call per recipient
        // (enforced by the mock's expected call count) and every
        // recipient receives the verbatim question.
        let question = "what is the capital of France?";
        let (router, registry) = router_with(marking_translator(), canned_assistant(2));
        let (a, mut rx_a) = connect(&registry).await;
        let (b, mut rx_b) = connect(&registry).await;
        registry.set_metadata(a, "Ann", "en").await;
        registry.set_metadata(b, "Bo", "hi").await;

        router
            .handle_event(
                a,
                InboundEvent::Message {
                    text: question.to_string(),
                    lang: None,
                },
            )
            .await;

        let event_a = recv_event(&mut rx_a);
        let event_b = recv_event(&mut rx_b);
        match &event_a {
            OutboundEvent::AiChat {
                from,
                from_lang,
                text,
                translated_text,
                to_lang,
                original_question,
            } => {
                assert_eq!(from, ASSISTANT_LABEL);
                assert_eq!(from_lang, "en");
                assert_eq!(text, &format!("Q: {}", question));
                assert_eq!(
                    translated_text,
                    &format!("A: answer to '{}'", question)
                );
                assert_eq!(to_lang, "en");
                assert_eq!(original_question, question);
            }
            other => panic!("expected ai_chat event, got {:?}", other),
        }
        match &event_b {
            OutboundEvent::AiChat {
                translated_text,
                to_lang,
                original_question,
                ..
            } => {
                // Bo's answer is re-translated into Hindi; Ann's is not.
                assert_eq!(
                    translated_text,
                    &format!("A: [hi] answer to '{}'", question)
                );
                assert_eq!(to_lang, "hi");
                assert_eq!(original_question, question);
            }
            other => panic!("expected ai_chat event, got {:?}", other),
        }
        assert_no_more_events(&mut rx_a);
        assert_no_more_events(&mut rx_b);
    }

    #[tokio::test]
    async fn test_fanout_tolerates_a_dead_recipient() {
        let (router, registry) = router_with(marking_translator(), canned_assistant(0));
        let (a, mut rx_a) = connect(&registry).await;
        let (b, rx_b) = connect(&registry).await;
        registry.set_metadata(a, "Ann", "en").await;
        registry.set_metadata(b, "Bo", "hi").await;

        // Bo's socket writer is gone: its channel receiver is dropped.
        drop(rx_b);

        router
            .handle_event(
                a,
                InboundEvent::Message {
                    text: "hello everyone".to_string(),
                    lang: None,
                },
            )
            .await;

        // Ann still gets her event; Bo has been unregistered.
        assert!(matches!(recv_event(&mut rx_a), OutboundEvent::Chat { .. }));
        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, a);
    }

    #[tokio::test]
    async fn test_no_sends_after_unregister() {
        let (router, registry) = router_with(marking_translator(), canned_assistant(0));
        let (a, mut rx_a) = connect(&registry).await;
        let (b, mut rx_b) = connect(&registry).await;

        registry.unregister(b).await;

        router
            .handle_event(
                a,
                InboundEvent::Message {
                    text: "hello again".to_string(),
                    lang: None,
                },
            )
            .await;

        assert!(matches!(recv_event(&mut rx_a), OutboundEvent::Chat { .. }));
        assert_no_more_events(&mut rx_b);
    }

    #[tokio::test]
    async fn test_fanout_over_empty_registry_completes() {
        let (router, registry) = router_with(marking_translator(), canned_assistant(0));
        let ghost = Uuid::new_v4();
        assert_eq!(registry.count().await, 0);

        // Must complete the gather barrier without error.
        router
            .handle_event(
                ghost,
                InboundEvent::Message {
                    text: "anyone here".to_string(),
                    lang: None,
                },
            )
            .await;
    }
}
