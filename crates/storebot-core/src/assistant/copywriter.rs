//! Product copy generation.
//!
//! Asks the text backend for a short description and a category for a new
//! product. Models do not always return clean JSON, so the reply is parsed
//! leniently and a keyword category fills any gap.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use super::fallback::GenerationSettings;
use crate::provider::types::ChatMessage;
use crate::provider::LlmProvider;

const COPY_PROMPT: &str = r#"You are an ecommerce expert for Nigerian SMEs. Generate product details in EXACT JSON format:

{
  "description": "Compelling 2-3 line description focusing on benefits for Nigerian customers",
  "category": "Single relevant category name like Electronics, Audio, Gadgets"
}

Rules:
- Description: 2-3 lines max, persuasive, highlight durability, battery life, sound quality
- Category: Simple, standard ecommerce category (no creative names)
- Be practical and relevant to Nigerian market"#;

static JSON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static pattern must compile"));

/// Generated listing text. Both fields are empty when generation failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCopy {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

pub struct ProductCopywriter {
    provider: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl ProductCopywriter {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Draft a description and category for a product. Never fails.
    pub async fn generate(&self, product_name: &str, price: f64) -> ProductCopy {
        let messages = [
            ChatMessage::system(COPY_PROMPT),
            ChatMessage::user(&format!("Product: {product_name}, Price: ₦{price}")),
        ];

        let response = self
            .provider
            .chat(
                &messages,
                self.settings.model.as_deref(),
                self.settings.max_tokens,
                self.settings.temperature,
            )
            .await;

        match response {
            Ok(response) => match response.text() {
                Some(text) => parse_copy(text, product_name),
                None => {
                    warn!(product = product_name, "Copy generation returned no text");
                    ProductCopy::default()
                }
            },
            Err(e) => {
                warn!(product = product_name, error = %e, "Copy generation failed");
                ProductCopy::default()
            }
        }
    }
}

/// Parse a model reply into [`ProductCopy`].
///
/// A JSON object anywhere in the text wins, and a malformed one yields empty
/// copy. Without braces, `description:` and `category:` lines are used and a
/// missing category is guessed from the product name.
pub fn parse_copy(content: &str, product_name: &str) -> ProductCopy {
    if let Some(block) = JSON_BLOCK.find(content) {
        return serde_json::from_str::<ProductCopy>(block.as_str()).unwrap_or_else(|e| {
            debug!(error = %e, "Reply contained a malformed JSON block");
            ProductCopy::default()
        });
    }

    let mut description = String::new();
    let mut category = String::new();

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if description.is_empty() {
            if let Some(rest) = strip_label(line, "description:") {
                description = rest.to_string();
                continue;
            }
        }
        if category.is_empty() {
            if let Some(rest) = strip_label(line, "category:") {
                category = rest.to_string();
            }
        }
    }

    if category.is_empty() {
        category = default_category(product_name).to_string();
    }

    ProductCopy {
        description,
        category,
    }
}

/// Text after a case-insensitive `label`, wherever it appears in the line.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let at = line.to_ascii_lowercase().find(label)?;
    Some(line[at + label.len()..].trim())
}

/// Guess a storefront category from keywords in the product name.
pub fn default_category(product_name: &str) -> &'static str {
    const RULES: &[(&[&str], &str)] = &[
        (&["speaker", "audio"], "Electronics"),
        (&["phone", "mobile"], "Mobile Phones"),
        (&["shoe", "footwear"], "Fashion"),
        (&["shirt", "cloth"], "Fashion"),
        (&["bag", "purse"], "Accessories"),
        (&["watch"], "Accessories"),
        (&["laptop", "computer"], "Computing"),
    ];

    let name = product_name.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map_or("General", |(_, category)| category)
}
