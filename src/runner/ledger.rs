use std::{
    collections::HashSet,
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read results ledger {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("results ledger {path} is not a valid result array: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write results ledger {path}: {message}")]
    Write { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "original_id", alias = "question_id")]
    pub question_id: String,
    #[serde(default)]
    pub original_question: String,
    pub model_answer: String,
    #[serde(default)]
    pub model_reasoning: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub inner_reasoning: String,
    pub is_correct: bool,
}

/// Per-file results, rewritten in full after every appended record.
#[derive(Debug)]
pub struct ResultsLedger {
    path: PathBuf,
    results: Vec<EvaluationResult>,
    completed: HashSet<String>,
}

impl ResultsLedger {
    /// Opens an existing ledger or starts an empty one. A file that exists
    /// but does not parse is an error and is left untouched.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let results = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str::<Vec<EvaluationResult>>(&raw).map_err(|source| {
                LedgerError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(LedgerError::Read { path, source }),
        };

        let completed = results
            .iter()
            .map(|result| result.question_id.clone())
            .collect();
        Ok(Self {
            path,
            results,
            completed,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.completed.contains(question_id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    pub fn append(&mut self, result: EvaluationResult) -> Result<(), LedgerError> {
        self.completed.insert(result.question_id.clone());
        self.results.push(result);
        self.persist()
    }

    fn persist(&self) -> Result<(), LedgerError> {
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|err| {
            self.write_error(format!(
                "failed to create directory '{}': {err}",
                parent.display()
            ))
        })?;

        let tmp_path = self.path.with_extension("tmp");
        let file = fs::File::create(&tmp_path).map_err(|err| {
            self.write_error(format!(
                "failed to create temp file '{}': {err}",
                tmp_path.display()
            ))
        })?;
        {
            let mut writer = BufWriter::new(file);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            self.results.serialize(&mut serializer).map_err(|err| {
                self.write_error(format!("failed to serialize results: {err}"))
            })?;
            writer
                .flush()
                .map_err(|err| self.write_error(format!("failed to flush temp file: {err}")))?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|err| self.write_error(format!("failed to sync temp file: {err}")))?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|err| {
            self.write_error(format!(
                "failed to replace from '{}': {err}",
                tmp_path.display()
            ))
        })?;

        if let Ok(parent_file) = fs::File::open(parent) {
            let _ = parent_file.sync_all();
        }

        Ok(())
    }

    fn write_error(&self, message: String) -> LedgerError {
        LedgerError::Write {
            path: self.path.clone(),
            message,
        }
    }
}
