use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

pub const ERROR_SENTINEL: &str = "ERROR";
pub const PARSE_ERROR_SENTINEL: &str = "PARSE_ERROR";

/// Outcome of the structured tier.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredOutcome {
    Parsed(Map<String, Value>),
    NoObject,
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAnswer {
    pub answer: String,
    pub reasoning: String,
}

/// Locates a JSON object in free-form model output. A ```json fence wins over
/// the outermost braces. The raw slice is tried first, then again with
/// backslashes doubled so LaTeX such as `\frac` survives.
pub fn parse_structured(text: &str) -> StructuredOutcome {
    let Some(candidate) = candidate_span(text) else {
        return StructuredOutcome::NoObject;
    };

    let mut last_error = String::new();
    for attempt in [candidate.to_string(), candidate.replace('\\', "\\\\")] {
        match serde_json::from_str::<Value>(&attempt) {
            Ok(Value::Object(map)) => return StructuredOutcome::Parsed(map),
            Ok(other) => last_error = format!("expected object, found {}", kind_name(&other)),
            Err(err) => last_error = err.to_string(),
        }
    }
    StructuredOutcome::Malformed(last_error)
}

/// Fallback tier: `"answer": "<A-D>"` anywhere in the text.
pub fn match_answer_letter(text: &str) -> Option<String> {
    answer_pattern()?
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|letter| letter.as_str().to_uppercase())
}

pub fn extract_answer(text: &str) -> ExtractedAnswer {
    if let StructuredOutcome::Parsed(map) = parse_structured(text) {
        let reasoning = map
            .get("reasoning")
            .map(value_text)
            .unwrap_or_else(|| text.to_string());
        let answer = map
            .get("answer")
            .map(value_text)
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
            .unwrap_or_else(|| PARSE_ERROR_SENTINEL.to_string());
        return ExtractedAnswer { answer, reasoning };
    }

    ExtractedAnswer {
        answer: match_answer_letter(text).unwrap_or_else(|| PARSE_ERROR_SENTINEL.to_string()),
        reasoning: text.to_string(),
    }
}

pub fn is_sentinel(answer: &str) -> bool {
    answer == ERROR_SENTINEL || answer == PARSE_ERROR_SENTINEL
}

pub fn is_correct(model_answer: &str, correct_answer: &str) -> bool {
    if is_sentinel(model_answer) {
        return false;
    }
    model_answer.trim().eq_ignore_ascii_case(correct_answer.trim())
}

fn candidate_span(text: &str) -> Option<&str> {
    const FENCE: &str = "```json";
    if let Some(fence) = text.find(FENCE) {
        let start = fence + FENCE.len();
        let end = text.rfind("```").filter(|end| *end >= start)?;
        return Some(text[start..end].trim());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| text[start..=end].trim())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn answer_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"(?i)"answer"\s*:\s*"([A-D])""#).ok())
        .as_ref()
}
