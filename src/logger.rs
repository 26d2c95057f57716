use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Ok,
    Mismatch,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct BatchLogEntry {
    pub ts: String,
    pub model: String,
    pub batch: usize,
    pub first_row: usize,
    pub size: usize,
    pub status: BatchStatus,
    pub answers: Option<usize>,
    pub correct: Option<usize>,
    pub error: Option<String>,
}

/// Run log path for a model inside the output directory.
pub fn run_log_path(output_dir: &Path, model: &str) -> PathBuf {
    output_dir.join(format!("{model}_run.jsonl"))
}

/// Append a log entry. Errors are printed to stderr but do not fail the run.
pub fn log_batch_to(entry: &BatchLogEntry, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("crossbench: failed to create log directory: {e}");
            return;
        }
    }

    let json = match serde_json::to_string(entry) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("crossbench: failed to serialize log entry: {e}");
            return;
        }
    };

    let mut file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("crossbench: failed to open run log: {e}");
            return;
        }
    };

    if let Err(e) = writeln!(file, "{json}") {
        eprintln!("crossbench: failed to write run log: {e}");
    }
}

/// Create a log entry for one batch.
#[allow(clippy::too_many_arguments)]
pub fn make_entry(
    model: &str,
    batch: usize,
    first_row: usize,
    size: usize,
    status: BatchStatus,
    answers: Option<usize>,
    correct: Option<usize>,
    error: Option<String>,
) -> BatchLogEntry {
    BatchLogEntry {
        ts: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        model: model.to_string(),
        batch,
        first_row,
        size,
        status,
        answers,
        correct,
        error,
    }
}
