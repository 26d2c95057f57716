//! Collect finished run artifacts for side-by-side comparison.

use std::path::Path;

use crate::types::{EvaluationReport, ProviderKind};

const ARTIFACT_PATTERN: &str = "*_results.json";

/// Headline numbers for one model's artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub model: String,
    pub provider: String,
    pub accuracy: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
}

impl ModelSummary {
    pub fn from_report(model: &str, report: &EvaluationReport) -> Self {
        Self {
            model: model.to_string(),
            provider: provider_label(model).to_string(),
            accuracy: report.accuracy,
            total_questions: report.total_questions,
            correct_answers: report.correct_answers,
        }
    }
}

/// Display name of the vendor behind `model`.
pub fn provider_label(model: &str) -> &'static str {
    match ProviderKind::for_model(model) {
        Some(ProviderKind::OpenAi) => "OpenAI",
        Some(ProviderKind::Anthropic) => "Anthropic",
        Some(ProviderKind::DeepSeek) => "DeepSeek",
        None if model.starts_with("deepseek") => "DeepSeek",
        None => "Unknown",
    }
}

/// Load every `*_results.json` in `dir`, best accuracy first. Files that fail
/// to read or parse are reported on stderr and skipped.
pub fn load_results(dir: &Path) -> Result<Vec<ModelSummary>, String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("failed to read results directory {}: {e}", dir.display()))?;

    let mut summaries = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !glob_match::glob_match(ARTIFACT_PATTERN, &file_name) {
            continue;
        }
        let Some(model) = file_name.strip_suffix("_results.json") else {
            continue;
        };
        let path = entry.path();
        let report: EvaluationReport = match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
        {
            Ok(r) => r,
            Err(e) => {
                eprintln!("crossbench: skipping {}: {e}", path.display());
                continue;
            }
        };
        summaries.push(ModelSummary::from_report(model, &report));
    }

    summaries.sort_by(|a, b| {
        b.accuracy
            .total_cmp(&a.accuracy)
            .then_with(|| a.model.cmp(&b.model))
    });
    Ok(summaries)
}
