use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::{chat_completion_text, post_json, CompletionProvider};
use crate::error::ProviderError;
use crate::types::ProviderKind;

pub(super) const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
/// The reasoner spends output tokens on its chain of thought before answering.
const MAX_TOKENS: u32 = 10000;

/// DeepSeek REST completions (OpenAI-compatible wire format).
pub struct DeepSeekProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl DeepSeekProvider {
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
        "messages": [{"role": "user", "content": prompt}],
        "temperature": 0,
        "max_tokens": MAX_TOKENS,
    })
}

impl CompletionProvider for DeepSeekProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeepSeek
    }

    fn send(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let request = self.client.post(&self.endpoint).bearer_auth(&self.api_key);
        let body = post_json(self.kind(), request, &request_body(prompt, model))?;
        chat_completion_text(self.kind(), &body)
    }
}
