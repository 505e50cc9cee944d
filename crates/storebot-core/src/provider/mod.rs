//! Text-generation provider trait.
//!
//! Defines the `LlmProvider` trait that every backend implements. The
//! `openai` module provides an OpenAI-compatible implementation that covers
//! Groq, Gemini's compatibility endpoint, OpenAI, OpenRouter and vLLM.

pub mod openai;
pub mod types;

use async_trait::async_trait;
use types::{ChatMessage, LlmResponse};

/// Trait for text-generation providers.
///
/// The assistant treats a provider as an opaque, best-effort service: it
/// sends one chat-style request per turn and never retries.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` - System prompt plus user message
    /// * `model` - Model identifier override (None = use default)
    /// * `max_tokens` - Maximum response tokens
    /// * `temperature` - Sampling temperature
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> anyhow::Result<LlmResponse>;

    /// Get the default model identifier.
    fn default_model(&self) -> &str;
}
