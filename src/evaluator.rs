//! Batch evaluation driver.
//!
//! Batches run strictly in dataset order. A batch that fails anywhere between
//! prompt building and scoring is dropped whole and the loop moves on; only
//! dataset loading and the final artifact write can end a run early.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::config::EvaluationConfig;
use crate::dataset;
use crate::error::{BatchError, EvalError, PersistenceError};
use crate::logger::{self, BatchStatus};
use crate::normalize::normalize_answers;
use crate::prompt::build_prompt;
use crate::provider::CompletionProvider;
use crate::types::{ClueRecord, EvaluationReport, ResultEntry};

/// Scored entries for one batch, plus how many answers the model actually gave.
#[derive(Debug)]
pub struct ScoredBatch {
    pub entries: Vec<ResultEntry>,
    pub received: usize,
}

/// Outcome of one batch: scored, or abandoned with a reason.
pub type BatchOutcome = Result<ScoredBatch, BatchError>;

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub report: EvaluationReport,
    pub artifact: PathBuf,
    pub skipped_batches: usize,
}

pub struct Evaluator<P> {
    config: EvaluationConfig,
    provider: P,
    show_progress: bool,
}

impl<P: CompletionProvider> Evaluator<P> {
    pub fn new(config: EvaluationConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Load the dataset, score every batch and write the results artifact.
    pub fn evaluate(&self, dataset_path: &Path, output_dir: &Path) -> Result<RunSummary, EvalError> {
        let records = dataset::load_dataset(dataset_path, self.config.max_rows)?;
        let (report, skipped_batches) = self.evaluate_records(&records, output_dir);
        let artifact = write_report(&report, output_dir)?;
        Ok(RunSummary {
            report,
            artifact,
            skipped_batches,
        })
    }

    /// Score `records` batch by batch. Returns the report and the number of
    /// abandoned batches. Batch events go to the run log under `output_dir`.
    pub fn evaluate_records(
        &self,
        records: &[ClueRecord],
        output_dir: &Path,
    ) -> (EvaluationReport, usize) {
        let model = self.config.model.as_str();
        let batch_size = self.config.batch_size.max(1);
        let log_path = logger::run_log_path(output_dir, model);
        let bar = self.progress_bar(records.len().div_ceil(batch_size));

        let mut entries: Vec<ResultEntry> = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for (index, batch) in records.chunks(batch_size).enumerate() {
            let first_row = index * batch_size;
            let log_entry = match self.process_batch(batch) {
                Ok(scored) => {
                    let status = if scored.received == batch.len() {
                        BatchStatus::Ok
                    } else {
                        bar.suspend(|| {
                            println!(
                                "Warning: Expected {} responses, got {}",
                                batch.len(),
                                scored.received
                            )
                        });
                        BatchStatus::Mismatch
                    };
                    let correct = scored.entries.iter().filter(|e| e.is_correct).count();
                    let entry = logger::make_entry(
                        model,
                        index,
                        first_row,
                        batch.len(),
                        status,
                        Some(scored.received),
                        Some(correct),
                        None,
                    );
                    entries.extend(scored.entries);
                    entry
                }
                Err(e) => {
                    bar.suspend(|| println!("Error processing batch {index}: {e}"));
                    skipped += 1;
                    logger::make_entry(
                        model,
                        index,
                        first_row,
                        batch.len(),
                        BatchStatus::Skipped,
                        None,
                        None,
                        Some(e.to_string()),
                    )
                }
            };
            logger::log_batch_to(&log_entry, &log_path);
            bar.inc(1);

            if !self.config.rate_limit.is_zero() {
                std::thread::sleep(self.config.rate_limit);
            }
        }
        bar.finish_and_clear();

        (EvaluationReport::from_entries(model, entries), skipped)
    }

    /// Prompt, call, normalize and score one batch.
    pub fn process_batch(&self, batch: &[ClueRecord]) -> BatchOutcome {
        let prompt = build_prompt(batch)?;
        let raw = self.provider.send(&prompt, &self.config.model)?;
        let answers = normalize_answers(&raw);
        let received = answers.len();
        let entries = batch
            .iter()
            .zip(reconcile(answers, batch.len()))
            .map(|(record, answer)| score_entry(record, answer))
            .collect();
        Ok(ScoredBatch { entries, received })
    }

    fn progress_bar(&self, batches: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(batches as u64);
        let style = ProgressStyle::with_template(
            "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(format!("Evaluating {}", self.config.model));
        bar
    }
}

/// Force `answers` to exactly `len` items: truncate, or pad with empty strings.
pub fn reconcile(mut answers: Vec<String>, len: usize) -> Vec<String> {
    answers.resize(len, String::new());
    answers
}

/// Case-insensitive exact match.
pub fn is_correct(expected: &str, received: &str) -> bool {
    expected.to_lowercase() == received.to_lowercase()
}

fn score_entry(record: &ClueRecord, received: String) -> ResultEntry {
    ResultEntry {
        clue: record.clue.clone(),
        expected: record.word.clone(),
        is_correct: is_correct(&record.word, &received),
        received,
    }
}

/// Path of the results artifact for `model`.
pub fn artifact_path(output_dir: &Path, model: &str) -> PathBuf {
    output_dir.join(format!("{model}_results.json"))
}

/// Write the report as pretty JSON. The file is written beside its final
/// name and renamed into place, so readers never see a partial artifact.
pub fn write_report(report: &EvaluationReport, output_dir: &Path) -> Result<PathBuf, PersistenceError> {
    let path = artifact_path(output_dir, &report.model);
    let parent = path.parent().unwrap_or(output_dir);
    std::fs::create_dir_all(parent).map_err(|source| PersistenceError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })?;

    let json = serde_json::to_string_pretty(report).map_err(|e| PersistenceError::Serialize {
        message: e.to_string(),
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    std::fs::write(&tmp, json).map_err(|source| PersistenceError::Write {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, &path).map_err(|source| PersistenceError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
