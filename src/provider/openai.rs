use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::{chat_completion_text, post_json, CompletionProvider};
use crate::error::ProviderError;
use crate::types::ProviderKind;

pub(super) const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const MAX_TOKENS: u32 = 1000;

/// OpenAI chat completions.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiProvider {
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

impl CompletionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn send(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let request = self.client.post(&self.endpoint).bearer_auth(&self.api_key);
        let body = post_json(self.kind(), request, &request_body(prompt, model))?;
        chat_completion_text(self.kind(), &body)
    }
}
