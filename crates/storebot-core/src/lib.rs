//! 🛒 storebot-core: Core library for the storebot storefront assistant.
//!
//! A seller types a message; the assistant either answers it from live store
//! data or hands it to a text-generation backend.
//!
//! - [`config`] — Typed configuration loading from JSON
//! - [`provider`] — LLM provider trait and OpenAI-compatible implementation
//! - [`store`] — Store data queries and the JSON file backend
//! - [`assistant`] — Intent detection, routing, command replies and fallback
//! - [`conversation`] — Message history with single-flight turns
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use storebot_core::assistant::{Assistant, GenerationSettings};
//! use storebot_core::config::Config;
//! use storebot_core::provider::openai::OpenAiProvider;
//! use storebot_core::store::{file::QueryLimits, FileStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//!
//! let (name, entry) = config.providers.find_active().expect("no provider configured");
//! let provider = OpenAiProvider::new(
//!     name,
//!     &entry.api_key,
//!     entry.api_base.as_deref(),
//!     &config.assistant.model,
//!     reqwest::Client::new(),
//! );
//! let store = FileStore::new(config.store_data_dir(), QueryLimits::default());
//!
//! let assistant = Assistant::new(Arc::new(store), Arc::new(provider), GenerationSettings::default());
//! let reply = assistant.process("How's my store doing?", "Tunde", &config.store.id).await;
//! println!("{}", reply.content);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod config;
pub mod conversation;
pub mod provider;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
