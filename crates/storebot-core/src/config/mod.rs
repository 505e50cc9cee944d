//! Configuration module for storebot.
//!
//! Loads typed configuration from `~/.storebot/config.json`.
//! All fields use `serde` defaults so a partial file is always valid.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub assistant: AssistantDefaults,
    pub store: StoreConfig,
    pub user: UserConfig,
}

impl Config {
    /// Load configuration from the default path (`~/.storebot/config.json`).
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Get the default config directory path.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".storebot")
    }

    /// Model the active provider will call. A per-provider `model` wins over
    /// `assistant.model`.
    pub fn active_model(&self) -> &str {
        self.providers
            .find_active()
            .and_then(|(_, entry)| entry.model.as_deref())
            .unwrap_or(&self.assistant.model)
    }

    /// Resolve the store data directory, expanding a leading `~/`.
    pub fn store_data_dir(&self) -> PathBuf {
        let raw = &self.store.data_dir;
        if raw.starts_with("~/") || raw.starts_with("~\\") {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(&raw[2..])
        } else {
            PathBuf::from(raw)
        }
    }

    /// Write the default config template to disk.
    pub fn write_default_template() -> anyhow::Result<PathBuf> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = serde_json::json!({
            "providers": {
                "groq": {
                    "apiKey": "gsk_YOUR_KEY_HERE"
                }
            },
            "assistant": {
                "model": "llama-3.1-8b-instant"
            },
            "store": {
                "id": "my-store",
                "dataDir": "~/.storebot/stores"
            },
            "user": {
                "firstName": "there"
            }
        });

        std::fs::write(&path, serde_json::to_string_pretty(&template)?)?;
        Ok(path)
    }

    /// Check the configuration for problems that would make the assistant
    /// useless. Returns every problem found, not just the first.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.providers.find_active().is_none() {
            errors.push(
                "No text-generation provider configured with a real API key. \
                 Edit config.json and replace the placeholder key."
                    .into(),
            );
        }

        if self.assistant.model.is_empty() {
            errors.push("assistant.model is empty. Specify a model name.".into());
        }

        if self.store.id.trim().is_empty() {
            errors.push("store.id is empty. Set the store to answer questions about.".into());
        }

        if self.assistant.max_tokens == 0 {
            errors.push("assistant.maxTokens must be greater than zero.".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// ── Provider Configuration ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderEntry {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: Option<String>,
}

impl ProviderEntry {
    fn is_usable(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.contains("YOUR_")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub groq: Option<ProviderEntry>,
    pub gemini: Option<ProviderEntry>,
    pub openai: Option<ProviderEntry>,
    pub openrouter: Option<ProviderEntry>,
    pub vllm: Option<ProviderEntry>,
}

impl ProvidersConfig {
    /// Find the first configured provider with a real API key.
    ///
    /// Groq is preferred, then Gemini's OpenAI-compatible endpoint.
    pub fn find_active(&self) -> Option<(&str, &ProviderEntry)> {
        let candidates: [(&str, &Option<ProviderEntry>); 5] = [
            ("groq", &self.groq),
            ("gemini", &self.gemini),
            ("openai", &self.openai),
            ("openrouter", &self.openrouter),
            ("vllm", &self.vllm),
        ];

        candidates
            .into_iter()
            .find_map(|(name, entry)| entry.as_ref().filter(|e| e.is_usable()).map(|e| (name, e)))
    }
}

// ── Assistant Configuration ─────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantDefaults {
    pub model: String,
    /// Token budget for casual replies.
    pub max_tokens: u32,
    pub temperature: f32,
    /// Token budget for product copy generation.
    pub copy_max_tokens: u32,
    pub request_timeout_secs: u64,
}

impl Default for AssistantDefaults {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".into(),
            max_tokens: 50,
            temperature: 0.7,
            copy_max_tokens: 150,
            request_timeout_secs: 30,
        }
    }
}

// ── Store Configuration ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    pub id: String,
    pub data_dir: String,
    pub low_stock_threshold: i64,
    pub best_sellers_limit: usize,
    pub recent_customers_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id: "my-store".into(),
            data_dir: "~/.storebot/stores".into(),
            low_stock_threshold: 5,
            best_sellers_limit: 5,
            recent_customers_limit: 10,
        }
    }
}

// ── User Configuration ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserConfig {
    pub first_name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            first_name: "there".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.assistant.model, "llama-3.1-8b-instant");
        assert_eq!(config.assistant.max_tokens, 50);
        assert_eq!(config.store.low_stock_threshold, 5);
        assert_eq!(config.store.best_sellers_limit, 5);
    }

    #[test]
    fn test_deserialize_minimal_json() {
        let json = r#"{"providers": {"groq": {"apiKey": "gsk-test"}}, "store": {"id": "shop-9"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.providers.groq.unwrap().api_key, "gsk-test");
        assert_eq!(config.store.id, "shop-9");
        assert_eq!(config.store.recent_customers_limit, 10);
    }

    #[test]
    fn test_find_active_skips_placeholders() {
        let json = r#"{"providers": {
            "groq": {"apiKey": "gsk_YOUR_KEY_HERE"},
            "gemini": {"apiKey": "real-gemini-key"}
        }}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let (name, entry) = config.providers.find_active().unwrap();
        assert_eq!(name, "gemini");
        assert_eq!(entry.api_key, "real-gemini-key");
    }

    #[test]
    fn test_active_model_prefers_provider_entry() {
        let json = r#"{
            "providers": {"gemini": {"apiKey": "real-gemini-key", "model": "gemini-1.5-flash"}},
            "assistant": {"model": "llama-3.1-8b-instant"}
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.active_model(), "gemini-1.5-flash");

        let json = r#"{"providers": {"groq": {"apiKey": "gsk-test"}}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.active_model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut config = Config::default();
        config.store.id = "  ".into();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("provider"));
        assert!(errors[1].contains("store.id"));
    }

    #[test]
    fn test_store_data_dir_absolute() {
        let mut config = Config::default();
        config.store.data_dir = "/srv/stores".into();
        assert_eq!(config.store_data_dir(), PathBuf::from("/srv/stores"));
    }
}
