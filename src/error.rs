//! Error types for a benchmark run.
//!
//! Configuration, dataset and persistence errors end the run. Provider and
//! batch errors are contained by the evaluator loop.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ProviderKind;

/// Missing or malformed configuration; fatal before the first batch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported model: {model}")]
    UnsupportedModel { model: String },

    #[error("{var} environment variable not set (required for {provider} models)")]
    MissingCredential {
        provider: ProviderKind,
        var: &'static str,
    },

    #[error("batch size must be a positive integer")]
    InvalidBatchSize,

    #[error("rate_limit must be a non-negative number of seconds, got {value}")]
    InvalidRateLimit { value: f64 },

    #[error("failed to create HTTP client: {message}")]
    HttpClient { message: String },
}

/// The dataset could not be loaded.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed dataset: {message}")]
    Csv { message: String },

    #[error("dataset is missing required column '{column}'")]
    MissingColumn { column: String },
}

/// A vendor call failed. Recoverable at batch granularity.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Http {
        provider: ProviderKind,
        message: String,
    },

    #[error("{provider} API returned {status}: {body}")]
    Status {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    #[error("unexpected {provider} response: {message}")]
    Shape {
        provider: ProviderKind,
        message: String,
    },
}

/// Why a single batch was abandoned.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("cannot build a prompt for an empty batch")]
    EmptyBatch,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The results artifact could not be written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize results: {message}")]
    Serialize { message: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors that escape a run.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl EvalError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            EvalError::Config(_) => 2,
            EvalError::Dataset(_) | EvalError::Persistence(_) => 1,
        }
    }
}
