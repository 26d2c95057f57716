//! Vendor adapters.
//!
//! Each adapter sends one prompt and hands back the raw text of the top
//! completion. The vendor is chosen once from the model identifier; after that
//! every call goes through [`CompletionProvider::send`].

mod anthropic;
mod deepseek;
mod openai;

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::EvaluationConfig;
use crate::error::{ConfigError, ProviderError};
use crate::types::ProviderKind;

pub use anthropic::AnthropicProvider;
pub use deepseek::DeepSeekProvider;
pub use openai::OpenAiProvider;

/// Longest error body kept in a `ProviderError::Status`.
const MAX_ERROR_BODY: usize = 500;

/// The one capability the evaluator needs from a vendor.
pub trait CompletionProvider {
    fn kind(&self) -> ProviderKind;

    /// Send `prompt` to `model` and return the raw completion text.
    fn send(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;
}

/// Closed set of supported vendors.
pub enum Provider {
    OpenAi(OpenAiProvider),
    Anthropic(AnthropicProvider),
    DeepSeek(DeepSeekProvider),
}

impl Provider {
    pub fn from_config(config: &EvaluationConfig) -> Result<Self, ConfigError> {
        let client = http_client(config.request_timeout)?;
        let api_key = config.api_key.clone();
        let endpoint = config.endpoint.clone();
        Ok(match config.provider {
            ProviderKind::OpenAi => {
                Provider::OpenAi(OpenAiProvider::new(client, api_key, endpoint))
            }
            ProviderKind::Anthropic => {
                Provider::Anthropic(AnthropicProvider::new(client, api_key, endpoint))
            }
            ProviderKind::DeepSeek => {
                Provider::DeepSeek(DeepSeekProvider::new(client, api_key, endpoint))
            }
        })
    }
}

impl CompletionProvider for Provider {
    fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenAi(p) => p.kind(),
            Provider::Anthropic(p) => p.kind(),
            Provider::DeepSeek(p) => p.kind(),
        }
    }

    fn send(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        match self {
            Provider::OpenAi(p) => p.send(prompt, model),
            Provider::Anthropic(p) => p.send(prompt, model),
            Provider::DeepSeek(p) => p.send(prompt, model),
        }
    }
}

/// Completion endpoint used when the config does not override it.
pub fn default_endpoint(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAi => openai::OPENAI_ENDPOINT,
        ProviderKind::Anthropic => anthropic::ANTHROPIC_ENDPOINT,
        ProviderKind::DeepSeek => deepseek::DEEPSEEK_ENDPOINT,
    }
}

fn http_client(timeout: Duration) -> Result<Client, ConfigError> {
    Client::builder()
        .user_agent(concat!("crossbench/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| ConfigError::HttpClient {
            message: e.to_string(),
        })
}

/// Send a prepared request with a JSON body and decode the JSON reply.
fn post_json(
    provider: ProviderKind,
    request: RequestBuilder,
    body: &Value,
) -> Result<Value, ProviderError> {
    let response = request.json(body).send().map_err(|e| ProviderError::Http {
        provider,
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().unwrap_or_default();
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body: truncate(&text, MAX_ERROR_BODY),
        });
    }

    response.json::<Value>().map_err(|e| ProviderError::Shape {
        provider,
        message: format!("body is not JSON: {e}"),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Text of `choices[0].message.content` in an OpenAI-style chat completion.
fn chat_completion_text(provider: ProviderKind, body: &Value) -> Result<String, ProviderError> {
    body.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.pointer("/message/content"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ProviderError::Shape {
            provider,
            message: "missing choices[0].message.content".to_string(),
        })
}
