use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::{post_json, CompletionProvider};
use crate::error::ProviderError;
use crate::types::ProviderKind;

pub(super) const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1000;

/// Anthropic Messages API.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl AnthropicProvider {
    pub fn new(client: Client, api_key: String, endpoint: String) -> Self {
        Self {
            client,
            api_key,
            endpoint,
        }
    }
}

fn request_body(prompt: &str, model: &str) -> Value {
    json!({
        "model": model,
        "max_tokens": MAX_TOKENS,
        "temperature": 0,
        "messages": [{"role": "user", "content": prompt}],
    })
}

/// Text of the first `text` content block.
fn message_text(body: &Value) -> Result<String, ProviderError> {
    body.get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        })
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ProviderError::Shape {
            provider: ProviderKind::Anthropic,
            message: "missing text block in content".to_string(),
        })
}

impl CompletionProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn send(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let request = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let body = post_json(self.kind(), request, &request_body(prompt, model))?;
        message_text(&body)
    }
}
