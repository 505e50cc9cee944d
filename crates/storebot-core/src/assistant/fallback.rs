//! Generative fallback for small talk and unrecognised questions.
//!
//! The message is forwarded to the text-generation backend with a short
//! persona prompt. The backend is best-effort: any failure yields a fixed
//! friendly line addressed to the user.

use std::sync::Arc;
use tracing::{info, warn};

use crate::provider::types::ChatMessage;
use crate::provider::LlmProvider;

/// Request parameters for the backend.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Model override; `None` uses the provider default.
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 50,
            temperature: 0.7,
        }
    }
}

pub struct GenerativeFallback {
    provider: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl GenerativeFallback {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Reply to `message`. Never fails.
    pub async fn respond(&self, message: &str, first_name: &str) -> String {
        let messages = [
            ChatMessage::system(&system_prompt(first_name)),
            ChatMessage::user(message),
        ];

        match self
            .provider
            .chat(
                &messages,
                self.settings.model.as_deref(),
                self.settings.max_tokens,
                self.settings.temperature,
            )
            .await
        {
            Ok(response) => match response.text() {
                Some(text) => {
                    info!(tokens = response.usage.total_tokens, "Generative reply complete");
                    text.to_string()
                }
                None => {
                    warn!("Text backend returned an empty completion");
                    format!("Hi {first_name}! 😊 How can I help with your store?")
                }
            },
            Err(e) => {
                warn!(error = %e, "Text backend failed, using canned reply");
                format!(
                    "Hey {first_name}! I'm doing great. What would you like to work on in your store today?"
                )
            }
        }
    }
}

fn system_prompt(first_name: &str) -> String {
    format!(
        "You are a friendly AI assistant for Nigerian e-commerce sellers. \
         Keep responses casual, brief (1-2 lines), and encouraging. \
         User's name is {first_name}. Respond like a helpful friend."
    )
}

/// Follow-up suggestions for a generated reply, chosen from the user's words.
pub fn smart_quick_replies(input: &str) -> &'static [&'static str] {
    let input = input.to_lowercase();

    if mentions(&input, &["business", "sales", "performance"]) {
        &["Store performance", "Today orders", "Best sellers", "Help"]
    } else if mentions(&input, &["product", "selling", "inventory"]) {
        &["Best sellers", "Low stock", "Add product", "Store analytics"]
    } else if mentions(&input, &["order", "customer", "shipping"]) {
        &["Today orders", "Pending orders", "Recent customers", "Help"]
    } else {
        &["Store performance", "Best sellers", "Today orders", "Help"]
    }
}

fn mentions(input: &str, words: &[&str]) -> bool {
    words.iter().any(|w| input.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingProvider, ScriptedProvider};

    #[tokio::test]
    async fn test_returns_completion_verbatim() {
        let provider = Arc::new(ScriptedProvider::replying("Sharp! Your store dey move. 🚀"));
        let fallback = GenerativeFallback::new(provider.clone(), GenerationSettings::default());

        let reply = fallback.respond("hello", "Amaka").await;
        assert_eq!(reply, "Sharp! Your store dey move. 🚀");

        let requests = provider.requests.lock().unwrap();
        let (messages, max_tokens) = &requests[0];
        assert_eq!(*max_tokens, 50);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Nigerian e-commerce"));
        assert!(messages[0].content.contains("Amaka"));
        assert_eq!(messages[1], ChatMessage::user("hello"));
    }

    #[tokio::test]
    async fn test_network_error_uses_named_fallback() {
        let fallback = GenerativeFallback::new(Arc::new(FailingProvider), GenerationSettings::default());
        let reply = fallback.respond("how are you?", "Amaka").await;
        assert_eq!(
            reply,
            "Hey Amaka! I'm doing great. What would you like to work on in your store today?"
        );
    }

    #[tokio::test]
    async fn test_empty_completion_uses_greeting() {
        let fallback =
            GenerativeFallback::new(Arc::new(ScriptedProvider::silent()), GenerationSettings::default());
        let reply = fallback.respond("yo", "Amaka").await;
        assert!(reply.starts_with("Hi Amaka!"));
    }

    #[test]
    fn test_smart_quick_replies_by_topic() {
        assert_eq!(smart_quick_replies("How is business?")[0], "Store performance");
        assert_eq!(smart_quick_replies("Tell me about my PRODUCT range")[1], "Low stock");
        assert_eq!(smart_quick_replies("shipping to Abuja")[1], "Pending orders");
        assert_eq!(
            smart_quick_replies("tell me a joke"),
            ["Store performance", "Best sellers", "Today orders", "Help"]
        );
    }

    #[test]
    fn test_smart_quick_replies_topic_precedence() {
        // Mentions sales and orders: the sales set wins.
        assert_eq!(smart_quick_replies("sales and orders")[0], "Store performance");
        // Mentions product and customer: the product set wins.
        assert_eq!(smart_quick_replies("product for a customer")[0], "Best sellers");
    }
}
