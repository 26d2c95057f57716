pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod logger;
pub mod normalize;
pub mod prompt;
pub mod provider;
pub mod summary;
pub mod types;
