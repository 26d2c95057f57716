use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::provider;
use crate::types::ProviderKind;

/// Runtime knobs read from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_rate_limit")]
    pub rate_limit: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_rows")]
    pub max_rows: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Per-vendor URL overrides (proxies, gateways, local stubs).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Endpoints {
    pub openai: Option<String>,
    pub anthropic: Option<String>,
    pub deepseek: Option<String>,
}

impl Endpoints {
    fn for_kind(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::OpenAi => self.openai.as_deref(),
            ProviderKind::Anthropic => self.anthropic.as_deref(),
            ProviderKind::DeepSeek => self.deepseek.as_deref(),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            rate_limit: default_rate_limit(),
            batch_size: default_batch_size(),
            max_rows: default_max_rows(),
            request_timeout: default_request_timeout(),
            endpoints: Endpoints::default(),
        }
    }
}

fn default_rate_limit() -> f64 {
    0.1
}

fn default_batch_size() -> usize {
    50
}

fn default_max_rows() -> Option<usize> {
    Some(5000)
}

fn default_request_timeout() -> u64 {
    300
}

/// Load the config file. JSON by default; `.yaml`/`.yml` files are read as YAML.
pub fn load_config_from_path(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_norway::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// API keys, resolved once at startup.
#[derive(Clone, Default)]
pub struct Credentials {
    openai: Option<String>,
    anthropic: Option<String>,
    deepseek: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve keys through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |kind: ProviderKind| {
            lookup(kind.credential_var())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            openai: get(ProviderKind::OpenAi),
            anthropic: get(ProviderKind::Anthropic),
            deepseek: get(ProviderKind::DeepSeek),
        }
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::OpenAi => self.openai.as_deref(),
            ProviderKind::Anthropic => self.anthropic.as_deref(),
            ProviderKind::DeepSeek => self.deepseek.as_deref(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = |v: &Option<String>| if v.is_some() { "set" } else { "unset" };
        f.debug_struct("Credentials")
            .field("openai", &state(&self.openai))
            .field("anthropic", &state(&self.anthropic))
            .field("deepseek", &state(&self.deepseek))
            .finish()
    }
}

/// Everything one model's run needs. Immutable once built.
#[derive(Clone)]
pub struct EvaluationConfig {
    pub model: String,
    pub provider: ProviderKind,
    pub api_key: String,
    pub endpoint: String,
    pub rate_limit: Duration,
    pub batch_size: usize,
    pub max_rows: Option<usize>,
    pub request_timeout: Duration,
}

impl EvaluationConfig {
    pub fn resolve(
        model: &str,
        file: &FileConfig,
        credentials: &Credentials,
    ) -> Result<Self, ConfigError> {
        let kind = ProviderKind::for_model(model).ok_or_else(|| ConfigError::UnsupportedModel {
            model: model.to_string(),
        })?;
        let api_key = credentials
            .get(kind)
            .ok_or(ConfigError::MissingCredential {
                provider: kind,
                var: kind.credential_var(),
            })?
            .to_string();
        if file.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        let rate_limit = Duration::try_from_secs_f64(file.rate_limit).map_err(|_| {
            ConfigError::InvalidRateLimit {
                value: file.rate_limit,
            }
        })?;
        let endpoint = file
            .endpoints
            .for_kind(kind)
            .unwrap_or(provider::default_endpoint(kind))
            .to_string();

        Ok(Self {
            model: model.to_string(),
            provider: kind,
            api_key,
            endpoint,
            rate_limit,
            batch_size: file.batch_size,
            max_rows: file.max_rows,
            request_timeout: Duration::from_secs(file.request_timeout),
        })
    }
}

impl std::fmt::Debug for EvaluationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationConfig")
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("rate_limit", &self.rate_limit)
            .field("batch_size", &self.batch_size)
            .field("max_rows", &self.max_rows)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
