use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One dataset row: a clue and the word it should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueRecord {
    pub clue: String,
    pub word: String,
    pub length: usize,
    /// Columns other than Clue/Word/Length, carried through untouched.
    pub extra: BTreeMap<String, String>,
}

impl ClueRecord {
    pub fn new(clue: &str, word: &str) -> Self {
        Self {
            clue: clue.to_string(),
            word: word.to_string(),
            length: word.chars().count(),
            extra: BTreeMap::new(),
        }
    }
}

/// Scored answer for a single clue, as persisted in the results artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub clue: String,
    pub expected: String,
    pub received: String,
    pub is_correct: bool,
}

/// Aggregate artifact written once at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model: String,
    pub accuracy: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub detailed_results: Vec<ResultEntry>,
}

impl EvaluationReport {
    /// Build a report from the ordered entries; counts and accuracy are derived.
    pub fn from_entries(model: &str, entries: Vec<ResultEntry>) -> Self {
        let total = entries.len();
        let correct = entries.iter().filter(|e| e.is_correct).count();
        Self {
            model: model.to_string(),
            accuracy: accuracy(correct, total),
            total_questions: total,
            correct_answers: correct,
            detailed_results: entries,
        }
    }
}

/// Percentage of correct answers; zero when nothing was scored.
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * correct as f64 / total as f64
    }
}

/// Vendor family behind a model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    DeepSeek,
}

impl ProviderKind {
    /// Map a model identifier to the vendor that serves it.
    pub fn for_model(model: &str) -> Option<Self> {
        if ["gpt", "o1", "o3", "o4"].iter().any(|p| model.starts_with(p)) {
            Some(ProviderKind::OpenAi)
        } else if model.starts_with("claude") {
            Some(ProviderKind::Anthropic)
        } else if matches!(model, "deepseek-chat" | "deepseek-reasoner") {
            Some(ProviderKind::DeepSeek)
        } else {
            None
        }
    }

    /// Environment variable holding this vendor's API key.
    pub fn credential_var(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::DeepSeek => "DeepSeek",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(expected: &str, received: &str, is_correct: bool) -> ResultEntry {
        ResultEntry {
            clue: format!("clue for {expected}"),
            expected: expected.to_string(),
            received: received.to_string(),
            is_correct,
        }
    }

    #[test]
    fn test_accuracy_zero_total() {
        assert_eq!(accuracy(0, 0), 0.0);
    }

    #[test]
    fn test_accuracy_three_of_four() {
        assert_eq!(accuracy(3, 4), 75.0);
    }

    #[test]
    fn test_report_counts_match_entries() {
        let report = EvaluationReport::from_entries(
            "gpt-4o",
            vec![
                entry("CAT", "cat", true),
                entry("DOG", "", false),
                entry("EMU", "EMU", true),
            ],
        );
        assert_eq!(report.total_questions, 3);
        assert_eq!(report.correct_answers, 2);
        assert_eq!(report.total_questions, report.detailed_results.len());
        assert!((report.accuracy - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_report_serializes_artifact_shape() {
        let report = EvaluationReport::from_entries("claude-3-opus", vec![entry("CAT", "CAT", true)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["model"], "claude-3-opus");
        assert_eq!(json["accuracy"], 100.0);
        assert_eq!(json["total_questions"], 1);
        assert_eq!(json["correct_answers"], 1);
        assert_eq!(json["detailed_results"][0]["expected"], "CAT");
        assert_eq!(json["detailed_results"][0]["is_correct"], true);
    }

    #[test]
    fn test_provider_for_model() {
        assert_eq!(ProviderKind::for_model("gpt-4o"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::for_model("o3-mini"), Some(ProviderKind::OpenAi));
        assert_eq!(
            ProviderKind::for_model("claude-3-opus"),
            Some(ProviderKind::Anthropic)
        );
        assert_eq!(
            ProviderKind::for_model("deepseek-reasoner"),
            Some(ProviderKind::DeepSeek)
        );
        assert_eq!(ProviderKind::for_model("deepseek-coder"), None);
        assert_eq!(ProviderKind::for_model("llama-3"), None);
    }

    #[test]
    fn test_clue_record_length_counts_chars() {
        let rec = ClueRecord::new("Café order", "CRÈME");
        assert_eq!(rec.length, 5);
    }
}
