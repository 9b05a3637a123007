//! Suggestion providers
//!
//! Defines the SuggestionProvider enum, SuggestError types, the
//! error-swallowing `get_suggestion` boundary and the request/response
//! messages exchanged with the suggestion worker thread.

use thiserror::Error;

use crate::config::{ProviderType, SuggestConfig};

mod canned;
mod completion;
mod worker;

pub use canned::CannedProvider;
pub use completion::CompletionClient;
pub use worker::spawn_worker;

/// Minimum trimmed length of the text before the caret for a suggestion
pub const MIN_CONTEXT_CHARS: usize = 3;

/// Errors that can occur while fetching a suggestion
#[derive(Debug, Error)]
pub enum SuggestError {
    /// Provider is missing required configuration (e.g. API key)
    #[error("Suggestions not configured: {0}")]
    NotConfigured(String),

    /// Network error during the API request
    #[error("Network error: {0}")]
    Network(String),

    /// API returned an error response
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Failed to parse the API response
    #[error("Parse error: {0}")]
    Parse(String),
}

/// What the provider is asked to continue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionContext {
    pub text_before_cursor: String,
    pub block_type: Option<String>,
}

impl SuggestionContext {
    pub fn new(text_before_cursor: impl Into<String>) -> Self {
        Self {
            text_before_cursor: text_before_cursor.into(),
            block_type: None,
        }
    }
}

/// Request sent to the suggestion worker
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    /// Unique ID for this request, used to filter stale responses
    pub request_id: u64,
    pub context: SuggestionContext,
}

/// Response from the suggestion worker; `text` is empty on any failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionResponse {
    pub request_id: u64,
    pub text: String,
}

/// Whether `text` is too short to be worth completing
pub fn below_floor(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() < min_chars
}

/// Suggestion provider implementations
#[derive(Debug)]
pub enum SuggestionProvider {
    /// Deterministic lookup keyed by the last word
    Canned(CannedProvider),
    /// Hosted OpenAI-compatible completion endpoint
    Completion(CompletionClient),
}

impl SuggestionProvider {
    /// Create a provider from configuration
    ///
    /// Returns an error if the completion provider has no API key.
    pub fn from_config(config: &SuggestConfig) -> Result<Self, SuggestError> {
        match config.provider {
            ProviderType::Canned => Ok(SuggestionProvider::Canned(CannedProvider::new(
                config.min_chars,
            ))),
            ProviderType::OpenAi => {
                let api_key = config.openai.resolved_api_key().ok_or_else(|| {
                    SuggestError::NotConfigured(
                        "Missing API key: set [suggest.openai] api_key or OPENAI_API_KEY"
                            .to_string(),
                    )
                })?;

                let model = Some(config.openai.model.trim())
                    .filter(|m| !m.is_empty())
                    .ok_or_else(|| {
                        SuggestError::NotConfigured(
                            "Missing or empty model in [suggest.openai] config".to_string(),
                        )
                    })?;

                Ok(SuggestionProvider::Completion(
                    CompletionClient::new(
                        api_key,
                        model.to_string(),
                        config.openai.base_url.clone(),
                        config.openai.max_tokens,
                    )
                    .with_min_chars(config.min_chars),
                ))
            }
        }
    }

    /// Fetch a continuation for the context
    pub async fn suggest(&self, context: &SuggestionContext) -> Result<String, SuggestError> {
        match self {
            SuggestionProvider::Canned(provider) => Ok(provider.suggest(context)),
            SuggestionProvider::Completion(client) => client.complete(context).await,
        }
    }
}

/// Fetch a suggestion, mapping every failure to an empty string
pub async fn get_suggestion(provider: &SuggestionProvider, context: &SuggestionContext) -> String {
    match provider.suggest(context).await {
        Ok(text) => text,
        Err(e) => {
            log::debug!("Suggestion provider failed: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
#[path = "suggest_tests.rs"]
mod suggest_tests;
