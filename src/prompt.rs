use crate::error::BatchError;
use crate::types::ClueRecord;

const PROMPT_HEADER: &str = "You are solving a crossword puzzle. Given the clues and their answer lengths, provide the correct words.\n\n";

const PROMPT_INSTRUCTION: &str = "Please provide your answers as a JSON array of strings, in the same order as the clues. Only provide the answer words, with no additional explanation or punctuation.";

/// Render a batch of clues into a single instruction. Pure: the same batch
/// always yields the same text.
pub fn build_prompt(batch: &[ClueRecord]) -> Result<String, BatchError> {
    if batch.is_empty() {
        return Err(BatchError::EmptyBatch);
    }
    let mut prompt = String::from(PROMPT_HEADER);
    for (i, record) in batch.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. Clue: {}\n   Length: {}\n\n",
            i + 1,
            record.clue,
            record.length
        ));
    }
    prompt.push_str(PROMPT_INSTRUCTION);
    Ok(prompt)
}
