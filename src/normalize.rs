//! Recover an ordered answer list from a model's raw reply.
//!
//! Models are asked for a JSON array but do not always produce one. The
//! recovery order is fixed: strict array parse, bracket-repair parse, then
//! line-by-line salvage. Never fails; the caller reconciles the length.

use serde_json::Value;

/// Normalize raw completion text into answer strings.
pub fn normalize_answers(raw: &str) -> Vec<String> {
    let content = strip_code_fences(raw);

    if is_bracketed(&content) {
        if let Some(answers) = parse_array(&content) {
            return answers;
        }
    }

    let inner = if is_bracketed(&content) {
        content[1..content.len() - 1].trim()
    } else {
        content.as_str()
    };
    if let Some(answers) = parse_array(&format!("[{inner}]")) {
        return answers;
    }

    split_lines(&content)
}

/// Remove every markdown fence marker and surrounding whitespace.
fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn is_bracketed(s: &str) -> bool {
    s.starts_with('[') && s.ends_with(']')
}

fn parse_array(text: &str) -> Option<Vec<String>> {
    let mut values: Vec<Value> = serde_json::from_str(text).ok()?;
    // [["A","B"]] is the same answer list wrapped once too often.
    if values.len() == 1 && values[0].is_array() {
        if let Some(Value::Array(inner)) = values.pop() {
            values = inner;
        }
    }
    Some(values.into_iter().map(value_to_answer).collect())
}

fn value_to_answer(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Any universal line terminator, bare `\r` included. A `\r\n` pair leaves
/// an empty piece that the blank-line filter drops.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn split_lines(content: &str) -> Vec<String> {
    content
        .split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.trim_matches(|c| matches!(c, '"' | '\'' | '.' | ','))
                .to_string()
        })
        .collect()
}
