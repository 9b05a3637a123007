// Configuration type definitions

use std::path::PathBuf;

use serde::Deserialize;

/// Environment variable consulted when `[suggest.openai] api_key` is unset
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Suggestion provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Canned,
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAi,
}

/// `[suggest.openai]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            max_tokens: 32,
        }
    }
}

impl OpenAiConfig {
    /// Configured key, falling back to the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// `[suggest]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SuggestConfig {
    pub enabled: bool,
    pub provider: ProviderType,
    pub debounce_ms: u64,
    pub min_chars: usize,
    pub openai: OpenAiConfig,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ProviderType::Canned,
            debounce_ms: 350,
            min_chars: 3,
            openai: OpenAiConfig::default(),
        }
    }
}

/// `[editor]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    pub character_limit: usize,
    pub document_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            character_limit: 5000,
            document_path: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub suggest: SuggestConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}
