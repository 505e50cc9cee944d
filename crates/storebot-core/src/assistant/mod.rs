//! Assistant pipeline: the per-message processing engine.
//!
//! For each message:
//! 1. [`router::AiRouter`] classifies it as a store command, small talk or a
//!    general question
//! 2. Commands go to [`commands::StoreCommandHandler`], which reads live store
//!    data
//! 3. Everything else goes to [`fallback::GenerativeFallback`]
//! 4. The reply is wrapped in an [`AssistantMessage`]

pub mod commands;
pub mod copywriter;
pub mod fallback;
pub mod intent;
pub mod reply;
pub mod router;

use std::sync::Arc;
use tracing::info;

use crate::provider::LlmProvider;
use crate::store::StoreData;
pub use commands::StoreCommandHandler;
pub use copywriter::{ProductCopy, ProductCopywriter};
pub use fallback::{smart_quick_replies, GenerationSettings, GenerativeFallback};
pub use intent::{Intent, IntentDetector};
pub use reply::{AssistantMessage, MessageType, Reply};
pub use router::{AiRouter, Handler, RouteCategory, RouteContext, RouteDecision};

/// Routes messages to the right responder.
pub struct Assistant {
    commands: StoreCommandHandler,
    fallback: GenerativeFallback,
}

impl Assistant {
    pub fn new(
        store: Arc<dyn StoreData>,
        provider: Arc<dyn LlmProvider>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            commands: StoreCommandHandler::new(store),
            fallback: GenerativeFallback::new(provider, settings),
        }
    }

    /// Answer one message. Never fails: store and backend errors degrade to
    /// empty data or canned text.
    pub async fn process(&self, input: &str, first_name: &str, store_id: &str) -> AssistantMessage {
        let decision = AiRouter::route(input, &RouteContext::new(first_name));

        let reply = match decision.handler() {
            Handler::Predefined => {
                self.commands
                    .handle(input, first_name, store_id, decision.intent())
                    .await
            }
            Handler::Groq => {
                let content = self.fallback.respond(input, first_name).await;
                Reply::message(content, smart_quick_replies(input))
            }
        };

        info!(
            category = ?decision.category(),
            handler = ?decision.handler(),
            navigates = reply.action().is_some(),
            "Assistant replied"
        );

        AssistantMessage::ai(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LowStockItem, StorePerformance};
    use crate::test_support::{CannedStore, FailingProvider, FailingStore, ScriptedProvider};

    fn assistant(store: CannedStore, provider: Arc<dyn LlmProvider>) -> Assistant {
        Assistant::new(Arc::new(store), provider, GenerationSettings::default())
    }

    #[tokio::test]
    async fn test_performance_question_reads_store() {
        let store = CannedStore {
            performance: StorePerformance {
                today_orders: 3,
                today_revenue: 15000.0,
                week_revenue: 42000.0,
                total_orders: 3,
            },
            ..CannedStore::default()
        };
        let provider = Arc::new(ScriptedProvider::replying("unused"));
        let assistant = assistant(store, provider.clone());

        let msg = assistant.process("How's my store doing?", "Tunde", "shop").await;
        assert_eq!(msg.message_type, MessageType::Ai);
        assert!(msg.content.contains("Today's Orders: 3"));
        assert!(msg.content.contains("₦15000"));
        assert!(msg.content.contains("₦42000"));
        assert!(msg.quick_replies.is_some());
        assert_eq!(provider.request_count(), 0);
    }

    #[tokio::test]
    async fn test_greeting_goes_to_backend() {
        let provider = Arc::new(ScriptedProvider::replying("Hey Tunde! 👋"));
        let assistant = assistant(CannedStore::default(), provider.clone());

        let msg = assistant.process("hello", "Tunde", "shop").await;
        assert_eq!(msg.content, "Hey Tunde! 👋");
        assert_eq!(msg.action, None);
        assert_eq!(
            msg.quick_replies.unwrap(),
            ["Store performance", "Best sellers", "Today orders", "Help"]
        );
        assert_eq!(provider.request_count(), 1);
    }

    #[tokio::test]
    async fn test_low_stock_question() {
        let store = CannedStore {
            low_stock: vec![LowStockItem {
                id: "p1".into(),
                name: "Widget".into(),
                stock: 2,
                threshold: 5,
            }],
            ..CannedStore::default()
        };
        let assistant = assistant(store, Arc::new(FailingProvider));

        let msg = assistant.process("what's low on stock", "Tunde", "shop").await;
        assert!(msg.content.contains("Widget: 2 left"));
    }

    #[tokio::test]
    async fn test_backend_failure_uses_named_fallback() {
        let assistant = assistant(CannedStore::default(), Arc::new(FailingProvider));

        let msg = assistant.process("tell me a joke", "Tunde", "shop").await;
        assert!(msg.content.contains("Tunde"));
        assert!(msg.quick_replies.is_some());
    }

    #[tokio::test]
    async fn test_store_failure_still_replies() {
        let assistant = Assistant::new(
            Arc::new(FailingStore),
            Arc::new(FailingProvider),
            GenerationSettings::default(),
        );

        let msg = assistant.process("How's my store doing?", "Tunde", "shop").await;
        assert!(msg.content.contains("Today's Orders: 0"));
        assert!(!msg.id.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_add_product_navigates() {
        let assistant = assistant(CannedStore::default(), Arc::new(FailingProvider));

        let msg = assistant.process("I want to add product", "Tunde", "shop").await;
        assert_eq!(msg.navigation_target(), Some("/dashboard/products"));
    }
}
