//! OpenAI-compatible chat completion client
//!
//! Sends the text before the caret as the prompt and returns the first
//! choice's content as the continuation.

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use super::{MIN_CONTEXT_CHARS, SuggestError, SuggestionContext, below_floor};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const SYSTEM_PROMPT: &str = "You complete the user's text inline. Reply with only the \
continuation of their text, without repeating it, without quotes or commentary.";

pub struct CompletionClient {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    min_chars: usize,
    http: reqwest::Client,
}

impl fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl CompletionClient {
    /// Create a new client; `base_url` defaults to the OpenAI endpoint
    pub fn new(api_key: String, model: String, base_url: Option<String>, max_tokens: u32) -> Self {
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_tokens,
            min_chars: MIN_CONTEXT_CHARS,
            http,
        }
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the JSON request body for a prompt
    pub fn build_request_body(&self, prompt: &str) -> Result<String, SuggestError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ]
        });
        serde_json::to_string(&body).map_err(|e| SuggestError::Parse(e.to_string()))
    }

    /// Request a continuation. Short input returns empty without a network call.
    pub async fn complete(&self, context: &SuggestionContext) -> Result<String, SuggestError> {
        if below_floor(&context.text_before_cursor, self.min_chars) {
            return Ok(String::new());
        }

        let body = self.build_request_body(&context.text_before_cursor)?;
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SuggestError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SuggestError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(SuggestError::Api {
                code: status.as_u16(),
                message: text,
            });
        }

        parse_completion(&text)
    }
}

/// Extract `choices[0].message.content` from a completion response body
pub fn parse_completion(body: &str) -> Result<String, SuggestError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SuggestError::Parse(e.to_string()))?;

    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.trim_end().to_string())
        .ok_or_else(|| SuggestError::Parse("missing choices[0].message.content".to_string()))
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod completion_tests;
