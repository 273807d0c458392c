use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read question set {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse question set {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub correct_answer: String,
}

#[derive(Debug, Deserialize)]
struct QuestionRecord {
    #[serde(default)]
    year: Value,
    #[serde(default)]
    number: Value,
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
}

#[derive(Debug, Default)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
    pub skipped_records: usize,
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

pub async fn load_question_set(path: &Path) -> Result<QuestionSet, DatasetError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_question_set(&raw).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_question_set(raw: &str) -> Result<QuestionSet, serde_json::Error> {
    let records: Vec<QuestionRecord> = serde_json::from_str(raw)?;
    let mut set = QuestionSet::default();

    for (position, record) in records.into_iter().enumerate() {
        let (Some(year), Some(number)) = (key_part(&record.year), key_part(&record.number)) else {
            tracing::warn!(
                target: "runner",
                position = position,
                "question_record_missing_key"
            );
            set.skipped_records += 1;
            continue;
        };
        set.questions.push(Question {
            id: question_id(&year, &number),
            text: record.question,
            correct_answer: record.answer,
        });
    }

    Ok(set)
}

pub fn question_id(year: &str, number: &str) -> String {
    format!("{}-{}", year, number)
}

fn key_part(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
