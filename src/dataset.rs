//! Dataset loading.
//!
//! Puzzle clue files are Latin-1 encoded. Every byte maps to the code point
//! with the same value, so decoding never fails.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::DatasetError;
use crate::types::ClueRecord;

const CLUE: &str = "Clue";
const WORD: &str = "Word";
const LENGTH: &str = "Length";

/// Decode Latin-1 bytes into a `String`.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Load the dataset at `path`, keeping at most `max_rows` records.
pub fn load_dataset(path: &Path, max_rows: Option<usize>) -> Result<Vec<ClueRecord>, DatasetError> {
    let bytes = std::fs::read(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&decode_latin1(&bytes), max_rows)
}

/// Parse CSV text with a header row into clue records.
pub fn parse_dataset(text: &str, max_rows: Option<usize>) -> Result<Vec<ClueRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::Csv {
            message: e.to_string(),
        })?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let clue_idx = column(CLUE).ok_or_else(|| DatasetError::MissingColumn {
        column: CLUE.to_string(),
    })?;
    let word_idx = column(WORD).ok_or_else(|| DatasetError::MissingColumn {
        column: WORD.to_string(),
    })?;
    let length_idx = column(LENGTH);

    let limit = max_rows.unwrap_or(usize::MAX);
    let mut records = Vec::new();
    for row in reader.records() {
        if records.len() >= limit {
            break;
        }
        let row = row.map_err(|e| DatasetError::Csv {
            message: e.to_string(),
        })?;
        let field = |idx: usize| row.get(idx).unwrap_or("").to_string();

        let word = field(word_idx);
        // A missing or non-numeric Length falls back to the word's character count.
        let length = length_idx
            .and_then(|idx| row.get(idx))
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or_else(|| word.chars().count());

        let extra: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != clue_idx && *idx != word_idx && Some(*idx) != length_idx)
            .map(|(idx, name)| (name.to_string(), field(idx)))
            .collect();

        records.push(ClueRecord {
            clue: field(clue_idx),
            word,
            length,
            extra,
        });
    }
    Ok(records)
}
